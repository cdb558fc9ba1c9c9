use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::entities::User;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::PlainTextToken;

/// An admin resolved from a bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin {
  pub user: User,
  pub token_id: Uuid,
  pub token_expires_at: DateTime<Utc>,
}

/// Use case for resolving a bearer token to its admin
pub struct AuthenticateAdminUseCase {
  auth_service: Arc<AuthService>,
}

impl AuthenticateAdminUseCase {
  /// Creates a new instance of AuthenticateAdminUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the token authentication use case
  ///
  /// # Errors
  /// Returns `AuthError::Unauthenticated` for malformed, unknown or expired
  /// tokens and `AuthError::Forbidden` when the token lacks admin rights
  pub async fn execute(&self, bearer: String) -> Result<AuthenticatedAdmin, AuthError> {
    // A malformed value can never match a stored token
    let plain_token = PlainTextToken::from_string(bearer).map_err(|_| AuthError::Unauthenticated)?;

    let (user, token) = self.auth_service.authenticate(&plain_token).await?;

    Ok(AuthenticatedAdmin {
      user,
      token_id: token.id,
      token_expires_at: token.expires_at,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{ADMIN_EMAIL, ADMIN_PASSWORD, AuthHarness};

  #[tokio::test]
  async fn test_valid_token_resolves_admin() {
    let harness = AuthHarness::new().await;
    let admin = harness.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;
    let (_, token, plain) = harness.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
    let use_case = AuthenticateAdminUseCase::new(harness.service.clone());

    let authenticated = use_case.execute(plain.as_str().to_string()).await.unwrap();

    assert_eq!(authenticated.user.id, admin.id);
    assert_eq!(authenticated.token_id, token.id);
  }

  #[tokio::test]
  async fn test_malformed_token_is_unauthenticated() {
    let harness = AuthHarness::new().await;
    let use_case = AuthenticateAdminUseCase::new(harness.service.clone());

    let result = use_case.execute("not a token".to_string()).await;

    assert!(matches!(result, Err(AuthError::Unauthenticated)));
  }

  #[tokio::test]
  async fn test_unknown_token_is_unauthenticated() {
    let harness = AuthHarness::new().await;
    let use_case = AuthenticateAdminUseCase::new(harness.service.clone());

    let result = use_case.execute("A".repeat(43)).await;

    assert!(matches!(result, Err(AuthError::Unauthenticated)));
  }
}
