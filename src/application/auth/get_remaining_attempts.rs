use std::net::IpAddr;
use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{LoginIdentifier, Origin};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemainingAttemptsResponse {
  pub remaining: u32,
  pub max_attempts: u32,
}

/// Use case for reporting how many login attempts are left
pub struct GetRemainingAttemptsUseCase {
  auth_service: Arc<AuthService>,
}

impl GetRemainingAttemptsUseCase {
  /// Creates a new instance of GetRemainingAttemptsUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Read-only; never counts as an attempt
  pub async fn execute(
    &self,
    email: String,
    origin: IpAddr,
  ) -> Result<RemainingAttemptsResponse, AuthError> {
    let identifier = LoginIdentifier::new(email)?;
    let origin = Origin::from(origin);

    let remaining = self
      .auth_service
      .remaining_attempts(&identifier, &origin)
      .await?;

    Ok(RemainingAttemptsResponse {
      remaining,
      max_attempts: self.auth_service.config().max_attempts,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{ADMIN_EMAIL, ADMIN_PASSWORD, AuthHarness, TEST_ORIGIN};

  #[tokio::test]
  async fn test_counts_down_and_floors_at_zero() {
    let harness = AuthHarness::new().await;
    harness.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;
    let use_case = GetRemainingAttemptsUseCase::new(harness.service.clone());

    let fresh = use_case
      .execute(ADMIN_EMAIL.to_string(), TEST_ORIGIN.parse().unwrap())
      .await
      .unwrap();
    assert_eq!(
      fresh,
      RemainingAttemptsResponse {
        remaining: 5,
        max_attempts: 5
      }
    );

    for _ in 0..7 {
      let _ = harness.login(ADMIN_EMAIL, "wrong").await;
    }

    let exhausted = use_case
      .execute(ADMIN_EMAIL.to_uppercase(), TEST_ORIGIN.parse().unwrap())
      .await
      .unwrap();
    assert_eq!(exhausted.remaining, 0);
  }
}
