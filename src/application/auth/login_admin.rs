use chrono::{DateTime, Utc};
use std::net::IpAddr;
use std::sync::Arc;

use super::admin_profile::AdminProfile;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{LoginIdentifier, Origin, Password};

/// Command for logging in to the admin panel
#[derive(Debug, Clone)]
pub struct LoginAdminCommand {
  /// Login identifier (email)
  pub email: String,
  /// Plain text password
  pub password: String,
  /// Client address the attempt came from
  pub origin: IpAddr,
}

/// Response after a successful admin login
#[derive(Debug, Clone)]
pub struct LoginAdminResponse {
  pub admin: AdminProfile,
  /// Bearer token; this is the only time its plain value is available
  pub token: String,
  pub expires_at: DateTime<Utc>,
}

/// Use case for logging in an admin
pub struct LoginAdminUseCase {
  auth_service: Arc<AuthService>,
}

impl LoginAdminUseCase {
  /// Creates a new instance of LoginAdminUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the admin login use case
  ///
  /// # Errors
  /// Returns `AuthError::RateLimited` or `AuthError::InvalidCredentials` when
  /// the attempt is refused
  pub async fn execute(&self, command: LoginAdminCommand) -> Result<LoginAdminResponse, AuthError> {
    let identifier = LoginIdentifier::new(command.email)?;
    let password = Password::new(command.password)?;
    let origin = Origin::from(command.origin);

    let (user, token, plain_token) = self
      .auth_service
      .attempt_login(identifier, password, origin)
      .await?;

    Ok(LoginAdminResponse {
      admin: AdminProfile::from(&user),
      token: plain_token.as_str().to_string(),
      expires_at: token.expires_at,
    })
  }
}
