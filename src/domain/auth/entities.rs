use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{Origin, TokenAbility, TokenHash};

/// Identity record of someone allowed to sign in to the admin panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  /// Unique identifier for the user
  pub id: Uuid,
  /// Display name
  pub name: String,
  /// Email address used as login identifier (unique, case-insensitive)
  pub email: String,
  /// Hashed password using Argon2
  pub password_hash: String,
  /// Whether the user may use the admin panel
  pub is_admin: bool,
  /// Timestamp of the most recent successful login
  pub last_login_at: Option<DateTime<Utc>>,
  /// Origin of the most recent successful login
  pub last_login_ip: Option<String>,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
  /// Timestamp when the user was last updated
  pub updated_at: DateTime<Utc>,
}

impl User {
  /// Creates a new user with the given details
  pub fn new(name: String, email: String, password_hash: String, is_admin: bool) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      name,
      email,
      password_hash,
      is_admin,
      last_login_at: None,
      last_login_ip: None,
      created_at: now,
      updated_at: now,
    }
  }

  /// Creates a user from database fields (for reconstruction)
  #[allow(clippy::too_many_arguments)]
  pub fn from_db(
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    is_admin: bool,
    last_login_at: Option<DateTime<Utc>>,
    last_login_ip: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      name,
      email,
      password_hash,
      is_admin,
      last_login_at,
      last_login_ip,
      created_at,
      updated_at,
    }
  }

  pub fn is_admin(&self) -> bool {
    self.is_admin
  }

  /// Stamps a successful login
  pub fn record_login(&mut self, at: DateTime<Utc>, origin: &Origin) {
    self.last_login_at = Some(at);
    self.last_login_ip = Some(origin.to_string());
    self.updated_at = at;
  }
}

/// Bearer credential issued on a successful admin login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
  /// Unique identifier for the token record
  pub id: Uuid,
  /// Reference to the user who owns this token
  pub user_id: Uuid,
  /// Human readable label
  pub name: String,
  /// SHA-256 of the plain-text token; the plain value is never stored
  pub token_hash: TokenHash,
  /// Capabilities granted by this token
  pub abilities: Vec<TokenAbility>,
  /// Timestamp of the last authenticated request made with the token
  pub last_used_at: Option<DateTime<Utc>>,
  /// Timestamp when the token expires
  pub expires_at: DateTime<Utc>,
  /// Timestamp when the token was issued
  pub created_at: DateTime<Utc>,
}

impl AccessToken {
  /// Issues a token at `issued_at` that lives for `ttl`
  pub fn issue(
    user_id: Uuid,
    name: impl Into<String>,
    token_hash: TokenHash,
    abilities: Vec<TokenAbility>,
    issued_at: DateTime<Utc>,
    ttl: Duration,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      user_id,
      name: name.into(),
      token_hash,
      abilities,
      last_used_at: None,
      expires_at: issued_at + ttl,
      created_at: issued_at,
    }
  }

  /// Creates a token from database fields (for reconstruction)
  #[allow(clippy::too_many_arguments)]
  pub fn from_db(
    id: Uuid,
    user_id: Uuid,
    name: String,
    token_hash: TokenHash,
    abilities: Vec<TokenAbility>,
    last_used_at: Option<DateTime<Utc>>,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      user_id,
      name,
      token_hash,
      abilities,
      last_used_at,
      expires_at,
      created_at,
    }
  }

  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    self.expires_at <= now
  }

  pub fn can(&self, ability: TokenAbility) -> bool {
    self.abilities.contains(&ability)
  }
}

/// Fixed-window counter of login attempts for one throttle key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptCounter {
  /// Attempts recorded in the current window
  pub hits: u32,
  /// End of the current window
  pub expires_at: DateTime<Utc>,
}

impl AttemptCounter {
  /// Opens a window with its first hit
  pub fn start(now: DateTime<Utc>, decay: Duration) -> Self {
    Self {
      hits: 1,
      expires_at: now + decay,
    }
  }

  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    self.expires_at <= now
  }

  /// Whole seconds until the window clears, rounded up
  pub fn seconds_remaining(&self, now: DateTime<Utc>) -> u64 {
    let millis = (self.expires_at - now).num_milliseconds();
    if millis <= 0 {
      return 0;
    }

    (millis as u64).div_ceil(1000)
  }
}
