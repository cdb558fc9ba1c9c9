pub mod admin_auth;
pub mod locale;
pub mod request_id;

// Re-export middleware components for easier access
pub use admin_auth::{AdminAuthMiddleware, AuthenticatedAdminExt};
pub use locale::{LocaleExt, LocaleMiddleware, RequestLocale};
pub use request_id::{RequestId, RequestIdExt, RequestIdMiddleware};
