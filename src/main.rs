use actix_files as fs;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{
  App, HttpServer,
  dev::{ServiceRequest, ServiceResponse, fn_service},
  middleware::Logger,
  web,
};
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portfolio::{
  adapters::http::{
    AdminRouteDependencies, LocaleMiddleware, PortfolioRouteDependencies, RequestIdMiddleware,
    TrustedProxies, configure_admin_routes, configure_portfolio_routes,
  },
  domain::auth::ports::{Clock, RateLimiter},
  domain::auth::services::AuthService,
  domain::portfolio::services::PortfolioService,
  infrastructure::{
    cache::{InMemoryRateLimiter, RedisRateLimiter},
    clock::SystemClock,
    config::{Config, RedisConfig},
    persistence::postgres::{
      PostgresAccessTokenRepository, PostgresPortfolioRepository, PostgresUserRepository,
    },
    security::{Argon2PasswordHasher, SecureTokenGenerator},
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "portfolio=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting portfolio backend");

  // Load configuration
  let config = Config::load().expect("Failed to load configuration");
  tracing::info!("Configuration loaded successfully");

  // Set up database connection pool with timeout
  tracing::info!("Connecting to database");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?",
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  // Run database migrations
  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .expect("Failed to run database migrations");
  tracing::info!("Database migrations completed");

  let clock: Arc<dyn Clock> = Arc::new(SystemClock);

  // Throttle counters live in Redis when configured so every instance shares them
  let rate_limiter: Arc<dyn RateLimiter> = match &config.redis {
    Some(redis_config) => Arc::new(connect_redis_rate_limiter(redis_config).await?),
    None => {
      tracing::warn!("No Redis configured; login throttling is per process");
      Arc::new(InMemoryRateLimiter::new(clock.clone()))
    }
  };

  // Initialize repositories
  let user_repo = Arc::new(PostgresUserRepository::new(db_pool.clone()));
  let token_repo = Arc::new(PostgresAccessTokenRepository::new(db_pool.clone()));
  let portfolio_repo = Arc::new(PostgresPortfolioRepository::new(db_pool.clone()));

  // Initialize security components
  let password_hasher = Arc::new(
    Argon2PasswordHasher::new().map_err(|e| std::io::Error::other(e.to_string()))?,
  );
  let token_generator = Arc::new(SecureTokenGenerator::new());

  let auth_config = config.auth_service_config();
  auth_config.validate().map_err(|e| {
    tracing::error!("Invalid login guard configuration: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;

  // Initialize services
  let auth_service = Arc::new(AuthService::new(
    user_repo,
    token_repo,
    rate_limiter,
    password_hasher,
    token_generator,
    clock,
    auth_config,
  ));
  let portfolio_service = Arc::new(PortfolioService::new(portfolio_repo));

  if config.server.trusted_proxies.is_empty() {
    tracing::info!("No trusted proxies; clients are identified by peer address");
  }
  let admin_deps = AdminRouteDependencies::new(auth_service).with_trusted_proxies(
    TrustedProxies::new(config.server.trusted_proxies.clone()),
  );
  let portfolio_deps = PortfolioRouteDependencies::new(portfolio_service);

  // Per-IP budget for the whole API, on top of the login throttle
  let governor_config = GovernorConfigBuilder::default()
    .per_millisecond(config.rate_limit.api_replenish_interval_ms)
    .burst_size(config.rate_limit.api_burst_size)
    .finish()
    .expect("Invalid API rate limit configuration");

  let default_locale = config.locale.default;
  let static_dir = config.server.static_dir.clone().map(PathBuf::from);
  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  // Create and start the HTTP server
  HttpServer::new(move || {
    let mut app = App::new()
      .wrap(LocaleMiddleware::new(default_locale))
      .wrap(RequestIdMiddleware::new())
      .wrap(Logger::default())
      .service(
        web::scope("/api")
          .wrap(Governor::new(&governor_config))
          .configure(|cfg| configure_admin_routes(cfg, admin_deps.clone()))
          .configure(|cfg| configure_portfolio_routes(cfg, portfolio_deps.clone())),
      )
      // Health check endpoint
      .route("/health", web::get().to(health_check));

    // Built single-page app; unknown paths get index.html for client-side routing
    if let Some(dir) = &static_dir {
      let index = dir.join("index.html");
      app = app.service(
        fs::Files::new("/", dir.clone())
          .index_file("index.html")
          .default_handler(fn_service(move |req: ServiceRequest| {
            let index = index.clone();
            async move {
              let (req, _) = req.into_parts();
              let file = fs::NamedFile::open_async(index).await?;
              let res = file.into_response(&req);
              Ok(ServiceResponse::new(req, res))
            }
          })),
      );
    }

    app
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}

/// Connects the shared throttle store, failing start-up if Redis is unreachable
async fn connect_redis_rate_limiter(
  redis_config: &RedisConfig,
) -> std::io::Result<RedisRateLimiter> {
  tracing::info!("Connecting to Redis");

  let redis_client = redis::Client::open(redis_config.url.clone()).map_err(|e| {
    tracing::error!("Failed to create Redis client: {}", e);
    std::io::Error::new(
      std::io::ErrorKind::InvalidInput,
      format!("Invalid Redis URL: {}", e),
    )
  })?;

  let redis_conn = tokio::time::timeout(
    Duration::from_secs(redis_config.connect_timeout_seconds),
    redis_client.get_connection_manager(),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Redis connection timed out after {} seconds. Is Redis running?",
      redis_config.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Redis connection timed out after {} seconds",
        redis_config.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to Redis: {}", e);
    std::io::Error::new(
      std::io::ErrorKind::ConnectionRefused,
      "Could not connect to Redis. Is Redis running?",
    )
  })?;

  tracing::info!("Redis connection established");

  Ok(RedisRateLimiter::with_prefix(
    redis_conn,
    redis_config.key_prefix.clone(),
  ))
}

/// Health check endpoint
async fn health_check() -> &'static str {
  "OK"
}
