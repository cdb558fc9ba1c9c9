use actix_web::web;
use std::sync::Arc;

use crate::application::auth::{
  AuthenticateAdminUseCase, GetCurrentAdminUseCase, GetRemainingAttemptsUseCase,
  LoginAdminUseCase, LogoutAdminUseCase,
};
use crate::application::portfolio::{
  GetProjectUseCase, ListEducationUseCase, ListExperiencesUseCase, ListProjectsUseCase,
  ListSkillsUseCase,
};
use crate::domain::auth::services::AuthService;
use crate::domain::portfolio::services::PortfolioService;

use super::client_ip::TrustedProxies;
use super::handlers::auth::{
  current_admin_handler, login_handler, logout_handler, remaining_attempts_handler,
};
use super::handlers::portfolio::{
  get_project_handler, list_education_handler, list_experiences_handler, list_projects_handler,
  list_skills_handler,
};
use super::middleware::AdminAuthMiddleware;

/// Use cases behind the admin endpoints
#[derive(Clone)]
pub struct AdminRouteDependencies {
  pub login: Arc<LoginAdminUseCase>,
  pub logout: Arc<LogoutAdminUseCase>,
  pub current_admin: Arc<GetCurrentAdminUseCase>,
  pub remaining_attempts: Arc<GetRemainingAttemptsUseCase>,
  pub authenticate: Arc<AuthenticateAdminUseCase>,
  /// Proxies allowed to name the client in `X-Forwarded-For`
  pub trusted_proxies: TrustedProxies,
}

impl AdminRouteDependencies {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self {
      login: Arc::new(LoginAdminUseCase::new(auth_service.clone())),
      logout: Arc::new(LogoutAdminUseCase::new(auth_service.clone())),
      current_admin: Arc::new(GetCurrentAdminUseCase::new()),
      remaining_attempts: Arc::new(GetRemainingAttemptsUseCase::new(auth_service.clone())),
      authenticate: Arc::new(AuthenticateAdminUseCase::new(auth_service)),
      trusted_proxies: TrustedProxies::default(),
    }
  }

  pub fn with_trusted_proxies(mut self, trusted_proxies: TrustedProxies) -> Self {
    self.trusted_proxies = trusted_proxies;
    self
  }
}

/// Use cases behind the public portfolio endpoints
#[derive(Clone)]
pub struct PortfolioRouteDependencies {
  pub list_projects: Arc<ListProjectsUseCase>,
  pub get_project: Arc<GetProjectUseCase>,
  pub list_experiences: Arc<ListExperiencesUseCase>,
  pub list_education: Arc<ListEducationUseCase>,
  pub list_skills: Arc<ListSkillsUseCase>,
}

impl PortfolioRouteDependencies {
  pub fn new(portfolio_service: Arc<PortfolioService>) -> Self {
    Self {
      list_projects: Arc::new(ListProjectsUseCase::new(portfolio_service.clone())),
      get_project: Arc::new(GetProjectUseCase::new(portfolio_service.clone())),
      list_experiences: Arc::new(ListExperiencesUseCase::new(portfolio_service.clone())),
      list_education: Arc::new(ListEducationUseCase::new(portfolio_service.clone())),
      list_skills: Arc::new(ListSkillsUseCase::new(portfolio_service)),
    }
  }
}

/// Configure admin routes
///
/// Mounts the admin endpoints under `/admin` inside the provided scope.
///
/// # Routes
///
/// - POST /admin/login - Exchange credentials for a bearer token
/// - GET /admin/login/attempts?email= - Attempts left before throttling
/// - POST /admin/logout - Revoke every token of the admin (bearer)
/// - GET /admin/me - The authenticated admin (bearer)
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// use std::sync::Arc;
/// # use portfolio::domain::auth::AuthService;
/// # use portfolio::adapters::http::routes::{AdminRouteDependencies, configure_admin_routes};
///
/// # async fn example(auth_service: Arc<AuthService>) {
/// let deps = AdminRouteDependencies::new(auth_service);
/// let app = App::new().service(
///   web::scope("/api").configure(|cfg| configure_admin_routes(cfg, deps.clone())),
/// );
/// # }
/// ```
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig, deps: AdminRouteDependencies) {
  cfg.service(
    web::scope("/admin")
      .app_data(web::Data::new(deps.login))
      .app_data(web::Data::new(deps.logout))
      .app_data(web::Data::new(deps.current_admin))
      .app_data(web::Data::new(deps.remaining_attempts))
      .app_data(web::Data::new(deps.trusted_proxies))
      .route("/login", web::post().to(login_handler))
      .route("/login/attempts", web::get().to(remaining_attempts_handler))
      // Protected routes
      .service(
        web::resource("/logout")
          .wrap(AdminAuthMiddleware::new(deps.authenticate.clone()))
          .route(web::post().to(logout_handler)),
      )
      .service(
        web::resource("/me")
          .wrap(AdminAuthMiddleware::new(deps.authenticate))
          .route(web::get().to(current_admin_handler)),
      ),
  );
}

/// Configure public portfolio routes
///
/// # Routes
///
/// - GET /projects[?featured=true]
/// - GET /projects/{slug}
/// - GET /experiences
/// - GET /education
/// - GET /skills
pub fn configure_portfolio_routes(cfg: &mut web::ServiceConfig, deps: PortfolioRouteDependencies) {
  cfg
    .app_data(web::Data::new(deps.list_projects))
    .app_data(web::Data::new(deps.get_project))
    .app_data(web::Data::new(deps.list_experiences))
    .app_data(web::Data::new(deps.list_education))
    .app_data(web::Data::new(deps.list_skills))
    .route("/projects", web::get().to(list_projects_handler))
    .route("/projects/{slug}", web::get().to(get_project_handler))
    .route("/experiences", web::get().to(list_experiences_handler))
    .route("/education", web::get().to(list_education_handler))
    .route("/skills", web::get().to(list_skills_handler));
}
