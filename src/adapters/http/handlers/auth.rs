use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  client_ip::TrustedProxies,
  dtos::{
    AttemptsQuery, CurrentAdminResponse, LoginRequest, LoginResponse, RemainingAttemptsDto,
    SuccessResponse,
  },
  errors::{ApiError, LocalizeErr},
  i18n::Message,
  middleware::{AuthenticatedAdminExt, RequestLocale},
};
use crate::application::auth::{
  GetCurrentAdminUseCase, GetRemainingAttemptsUseCase, LoginAdminCommand, LoginAdminUseCase,
  LogoutAdminUseCase,
};

/// Handler for admin login
///
/// POST /api/admin/login
/// Body: LoginRequest (JSON)
/// Response: LoginResponse (JSON) with status 200
pub async fn login_handler(
  request: web::Json<LoginRequest>,
  use_case: web::Data<Arc<LoginAdminUseCase>>,
  proxies: web::Data<TrustedProxies>,
  locale: RequestLocale,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let locale = locale.locale();
  let request = request.into_inner().trimmed();
  request.validate().localize_err(locale)?;

  let command = LoginAdminCommand {
    email: request.email,
    password: request.password,
    origin: proxies.client_ip(&http_req),
  };

  let response = use_case.execute(command).await.localize_err(locale)?;

  Ok(HttpResponse::Ok().json(LoginResponse::from(response)))
}

/// Handler for the remaining login attempts of an identifier
///
/// GET /api/admin/login/attempts?email=
/// Response: RemainingAttemptsDto (JSON) with status 200
pub async fn remaining_attempts_handler(
  query: web::Query<AttemptsQuery>,
  use_case: web::Data<Arc<GetRemainingAttemptsUseCase>>,
  proxies: web::Data<TrustedProxies>,
  locale: RequestLocale,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let locale = locale.locale();
  let email = query.into_inner().email.trim().to_string();

  let response = use_case
    .execute(email, proxies.client_ip(&http_req))
    .await
    .localize_err(locale)?;

  Ok(HttpResponse::Ok().json(RemainingAttemptsDto::from(response)))
}

/// Handler for admin logout; revokes every token of the admin
///
/// POST /api/admin/logout
/// Headers: Authorization: Bearer <token>
/// Response: SuccessResponse (JSON) with status 200
pub async fn logout_handler(
  use_case: web::Data<Arc<LogoutAdminUseCase>>,
  locale: RequestLocale,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let locale = locale.locale();
  let admin = http_req.authenticated_admin().localize_err(locale)?;

  use_case.execute(admin.user.id).await.localize_err(locale)?;

  let response = SuccessResponse {
    message: Message::LoggedOut.render(locale),
  };

  Ok(HttpResponse::Ok().json(response))
}

/// Handler for the authenticated admin
///
/// GET /api/admin/me
/// Headers: Authorization: Bearer <token>
/// Response: CurrentAdminResponse (JSON) with status 200
pub async fn current_admin_handler(
  use_case: web::Data<Arc<GetCurrentAdminUseCase>>,
  locale: RequestLocale,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let admin = http_req
    .authenticated_admin()
    .localize_err(locale.locale())?;

  let response = CurrentAdminResponse {
    user: use_case.execute(&admin).into(),
  };

  Ok(HttpResponse::Ok().json(response))
}
