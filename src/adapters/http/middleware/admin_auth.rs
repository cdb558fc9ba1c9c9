use actix_web::{
  Error, HttpMessage, HttpRequest, ResponseError,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::header::AUTHORIZATION,
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use super::locale::LocaleExt;
use crate::{
  adapters::http::errors::{ApiError, ApiErrorKind, AuthErrorKind},
  application::auth::{AuthenticateAdminUseCase, AuthenticatedAdmin},
};

/// Admin authentication middleware that validates bearer tokens
///
/// This middleware:
/// 1. Extracts the bearer token from the Authorization header
/// 2. Resolves it to an admin using AuthenticateAdminUseCase
/// 3. Attaches the AuthenticatedAdmin to request extensions
/// 4. Returns a localized 401 for missing, unknown or expired tokens and 403
///    for tokens without admin rights
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// use std::sync::Arc;
/// # use portfolio::application::auth::AuthenticateAdminUseCase;
/// # use portfolio::adapters::http::middleware::admin_auth::AdminAuthMiddleware;
///
/// # async fn example(authenticate: Arc<AuthenticateAdminUseCase>) {
/// let app = App::new().service(
///   web::resource("/api/admin/me")
///     .wrap(AdminAuthMiddleware::new(authenticate))
///     .route(web::get().to(|| async { "Protected endpoint" })),
/// );
/// # }
/// ```
pub struct AdminAuthMiddleware {
  authenticate: Arc<AuthenticateAdminUseCase>,
}

impl AdminAuthMiddleware {
  /// Creates a new admin authentication middleware
  pub fn new(authenticate: Arc<AuthenticateAdminUseCase>) -> Self {
    Self { authenticate }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AdminAuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AdminAuthMiddlewareService {
      service: Rc::new(service),
      authenticate: self.authenticate.clone(),
    }))
  }
}

pub struct AdminAuthMiddlewareService<S> {
  service: Rc<S>,
  authenticate: Arc<AuthenticateAdminUseCase>,
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let authenticate = self.authenticate.clone();

    Box::pin(async move {
      let locale = req.locale().locale();

      let outcome = match extract_bearer_token(&req) {
        Some(token) => authenticate
          .execute(token)
          .await
          .map_err(|e| ApiError::from(e).localized(locale)),
        None => {
          Err(ApiError::new(ApiErrorKind::Auth(AuthErrorKind::Unauthenticated)).localized(locale))
        }
      };

      let admin = match outcome {
        Ok(admin) => admin,
        Err(error) => {
          tracing::debug!("Rejected admin request to {}: {}", req.path(), error);
          let (request, _) = req.into_parts();
          let response = error.error_response().map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      req.extensions_mut().insert(admin);

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

/// Extract bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
  req
    .headers()
    .get(AUTHORIZATION)
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
}

/// Extension trait to extract the authenticated admin from a request
pub trait AuthenticatedAdminExt {
  /// Get the admin attached by AdminAuthMiddleware
  ///
  /// Fails with `Unauthenticated` on routes the middleware does not guard.
  fn authenticated_admin(&self) -> Result<AuthenticatedAdmin, ApiError>;
}

impl AuthenticatedAdminExt for HttpRequest {
  fn authenticated_admin(&self) -> Result<AuthenticatedAdmin, ApiError> {
    self
      .extensions()
      .get::<AuthenticatedAdmin>()
      .cloned()
      .ok_or_else(|| {
        tracing::warn!("No authenticated admin in request extensions for {}", self.path());
        ApiError::new(ApiErrorKind::Auth(AuthErrorKind::Unauthenticated))
      })
  }
}
