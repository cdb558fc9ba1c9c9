use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;

/// Response after logging out
#[derive(Debug, Clone)]
pub struct LogoutAdminResponse {
  /// Number of access tokens revoked
  pub revoked: u64,
}

/// Use case for logging out an admin from every device
pub struct LogoutAdminUseCase {
  auth_service: Arc<AuthService>,
}

impl LogoutAdminUseCase {
  /// Creates a new instance of LogoutAdminUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Revokes all tokens of the admin. Safe to repeat.
  pub async fn execute(&self, user_id: Uuid) -> Result<LogoutAdminResponse, AuthError> {
    let revoked = self.auth_service.logout(user_id).await?;

    Ok(LogoutAdminResponse { revoked })
  }
}
