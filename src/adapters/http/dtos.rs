use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::auth::{AdminProfile, LoginAdminResponse, RemainingAttemptsResponse};

/// Request for admin login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
  /// Admin email address
  #[validate(
    length(min = 1, message = "Email is required"),
    email(message = "Invalid email format")
  )]
  #[serde(default)]
  pub email: String,

  /// Admin password
  #[validate(length(min = 1, message = "Password is required"))]
  #[serde(default)]
  pub password: String,
}

impl LoginRequest {
  /// Strips surrounding whitespace from the identifier. Passwords are kept
  /// verbatim.
  pub fn trimmed(mut self) -> Self {
    let trimmed = self.email.trim();
    if trimmed.len() != self.email.len() {
      self.email = trimmed.to_string();
    }
    self
  }
}

/// Public admin identity
#[derive(Debug, Clone, Serialize)]
pub struct AdminUserDto {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_login_at: Option<DateTime<Utc>>,
}

impl From<AdminProfile> for AdminUserDto {
  fn from(profile: AdminProfile) -> Self {
    Self {
      id: profile.id,
      name: profile.name,
      email: profile.email,
      last_login_at: profile.last_login_at,
    }
  }
}

/// Response after successful admin login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
  pub user: AdminUserDto,

  /// Bearer token for the `Authorization` header
  pub token: String,

  /// Always `Bearer`
  pub token_type: &'static str,

  /// Token expiration timestamp
  pub expires_at: DateTime<Utc>,
}

impl From<LoginAdminResponse> for LoginResponse {
  fn from(response: LoginAdminResponse) -> Self {
    Self {
      user: response.admin.into(),
      token: response.token,
      token_type: "Bearer",
      expires_at: response.expires_at,
    }
  }
}

/// Query for the remaining login attempts; a blank email is rejected by the
/// use case
#[derive(Debug, Clone, Deserialize)]
pub struct AttemptsQuery {
  #[serde(default)]
  pub email: String,
}

/// Login attempts left before the identifier is throttled
#[derive(Debug, Clone, Serialize)]
pub struct RemainingAttemptsDto {
  pub remaining: u32,
  pub max_attempts: u32,
}

impl From<RemainingAttemptsResponse> for RemainingAttemptsDto {
  fn from(response: RemainingAttemptsResponse) -> Self {
    Self {
      remaining: response.remaining,
      max_attempts: response.max_attempts,
    }
  }
}

/// Response containing the authenticated admin
#[derive(Debug, Clone, Serialize)]
pub struct CurrentAdminResponse {
  pub user: AdminUserDto,
}

/// Filter for the project listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectsQuery {
  #[serde(default)]
  pub featured: bool,
}

/// Standard success response for operations without data
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
  /// Success message
  pub message: String,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional detailed error information
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}
