pub mod client_ip;
pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod i18n;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use client_ip::TrustedProxies;
pub use dtos::{
  AdminUserDto, CurrentAdminResponse, ErrorResponse, LoginRequest, LoginResponse,
  RemainingAttemptsDto, SuccessResponse,
};
pub use errors::{ApiError, ApiErrorKind, AuthErrorKind, LocalizeErr};
pub use i18n::Message;
pub use middleware::{
  AdminAuthMiddleware, AuthenticatedAdminExt, LocaleExt, LocaleMiddleware, RequestId,
  RequestIdExt, RequestIdMiddleware, RequestLocale,
};
pub use routes::{
  AdminRouteDependencies, PortfolioRouteDependencies, configure_admin_routes,
  configure_portfolio_routes,
};
