use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::domain::auth::errors::{AuthError, RepositoryError};
use crate::domain::auth::ports::RateLimiter;
use crate::domain::auth::value_objects::ThrottleKey;

/// Namespace for throttle counters
pub const DEFAULT_KEY_PREFIX: &str = "portfolio:login:";

/// Redis-backed throttle store shared by every application instance
///
/// Each key holds an integer counter whose TTL is the window. The window is
/// opened with `SET NX EX` and counted with `INCR` inside one MULTI/EXEC, so
/// concurrent hits never lose increments and never leave a counter without
/// an expiry.
#[derive(Clone)]
pub struct RedisRateLimiter {
  manager: ConnectionManager,
  prefix: String,
}

impl RedisRateLimiter {
  pub fn new(manager: ConnectionManager) -> Self {
    Self::with_prefix(manager, DEFAULT_KEY_PREFIX)
  }

  pub fn with_prefix(manager: ConnectionManager, prefix: impl Into<String>) -> Self {
    Self {
      manager,
      prefix: prefix.into(),
    }
  }
}

/// Build full Redis key with namespace prefix
fn build_key(prefix: &str, key: &ThrottleKey) -> String {
  format!("{}{}", prefix, key)
}

/// Converts a PTTL reply to whole seconds, rounded up
fn pttl_to_seconds(pttl_ms: i64) -> u64 {
  if pttl_ms <= 0 {
    // -2: no such key, -1: no expiry
    return 0;
  }

  (pttl_ms as u64).div_ceil(1000)
}

fn cache_error(operation: &str, error: redis::RedisError) -> AuthError {
  tracing::error!("Redis {} operation failed: {}", operation, error);
  AuthError::Repository(RepositoryError::from(error))
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
  async fn attempts(&self, key: &ThrottleKey) -> Result<u32, AuthError> {
    let redis_key = build_key(&self.prefix, key);
    let mut conn = self.manager.clone();

    let hits: Option<u32> = conn
      .get(&redis_key)
      .await
      .map_err(|e| cache_error("GET", e))?;

    Ok(hits.unwrap_or(0))
  }

  async fn hit(&self, key: &ThrottleKey, decay_seconds: u64) -> Result<u32, AuthError> {
    let redis_key = build_key(&self.prefix, key);
    let mut conn = self.manager.clone();

    let (hits,): (u32,) = redis::pipe()
      .atomic()
      .cmd("SET")
      .arg(&redis_key)
      .arg(0)
      .arg("EX")
      .arg(decay_seconds)
      .arg("NX")
      .ignore()
      .cmd("INCR")
      .arg(&redis_key)
      .query_async(&mut conn)
      .await
      .map_err(|e| cache_error("SET NX/INCR", e))?;

    Ok(hits)
  }

  async fn clear(&self, key: &ThrottleKey) -> Result<(), AuthError> {
    let redis_key = build_key(&self.prefix, key);
    let mut conn = self.manager.clone();

    let _: () = conn
      .del(&redis_key)
      .await
      .map_err(|e| cache_error("DEL", e))?;

    Ok(())
  }

  async fn available_in(&self, key: &ThrottleKey) -> Result<u64, AuthError> {
    let redis_key = build_key(&self.prefix, key);
    let mut conn = self.manager.clone();

    let pttl: i64 = conn
      .pttl(&redis_key)
      .await
      .map_err(|e| cache_error("PTTL", e))?;

    Ok(pttl_to_seconds(pttl))
  }
}
