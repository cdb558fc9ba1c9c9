//! Admin authentication use cases
//!
//! Each use case wraps the login guard for one entry point of the HTTP layer.

mod admin_profile;
mod authenticate_admin;
mod get_current_admin;
mod get_remaining_attempts;
mod login_admin;
mod logout_admin;

pub use admin_profile::AdminProfile;
pub use authenticate_admin::{AuthenticateAdminUseCase, AuthenticatedAdmin};
pub use get_current_admin::GetCurrentAdminUseCase;
pub use get_remaining_attempts::{GetRemainingAttemptsUseCase, RemainingAttemptsResponse};
pub use login_admin::{LoginAdminCommand, LoginAdminResponse, LoginAdminUseCase};
pub use logout_admin::{LogoutAdminResponse, LogoutAdminUseCase};
