use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::entities::{AccessToken, User};
use super::errors::AuthError;
use super::value_objects::{
  LoginIdentifier, Password, PasswordHash, PlainTextToken, ThrottleKey, TokenHash,
};

/// Repository trait for user persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Creates a new user in the repository
  async fn create(&self, user: User) -> Result<User, AuthError>;

  /// Finds a user by their unique identifier
  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

  /// Finds a user by login identifier, ignoring case
  async fn find_by_login(&self, identifier: &LoginIdentifier) -> Result<Option<User>, AuthError>;

  /// Updates an existing user
  async fn update(&self, user: User) -> Result<User, AuthError>;
}

/// Repository trait for bearer token persistence operations
#[async_trait]
pub trait AccessTokenRepository: Send + Sync {
  /// Stores a newly issued token
  async fn create(&self, token: AccessToken) -> Result<AccessToken, AuthError>;

  /// Finds a token by the hash of its plain-text value
  async fn find_by_token_hash(&self, token_hash: &TokenHash)
  -> Result<Option<AccessToken>, AuthError>;

  /// Lists every token belonging to a user
  async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<AccessToken>, AuthError>;

  /// Records that the token was just used
  async fn touch(&self, token_id: Uuid, at: DateTime<Utc>) -> Result<(), AuthError>;

  /// Deletes a specific token
  async fn delete(&self, token_id: Uuid) -> Result<(), AuthError>;

  /// Deletes all tokens of a user, returning how many were removed
  async fn delete_all_for_user(&self, user_id: Uuid) -> Result<u64, AuthError>;

  /// Deletes all tokens of the token's owner, then stores the token.
  ///
  /// Implementations backed by a transactional store should override this
  /// so that no other token of the user survives a concurrent login.
  async fn replace_all_for_user(&self, token: AccessToken) -> Result<AccessToken, AuthError> {
    self.delete_all_for_user(token.user_id).await?;
    self.create(token).await
  }
}

/// Fixed-window hit counter keyed by throttle key
#[async_trait]
pub trait RateLimiter: Send + Sync {
  /// Number of hits in the live window for `key` (0 when none)
  async fn attempts(&self, key: &ThrottleKey) -> Result<u32, AuthError>;

  /// Records a hit, opening a `decay_seconds` window if none is live.
  /// Returns the hit count after the increment.
  async fn hit(&self, key: &ThrottleKey, decay_seconds: u64) -> Result<u32, AuthError>;

  /// Drops the window for `key`
  async fn clear(&self, key: &ThrottleKey) -> Result<(), AuthError>;

  /// Seconds until the live window for `key` clears (0 when none)
  async fn available_in(&self, key: &ThrottleKey) -> Result<u64, AuthError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError>;

  /// Verifies a plain text password against a hashed password
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError>;
}

/// Service trait for secure token generation
#[async_trait]
pub trait TokenGenerator: Send + Sync {
  /// Generates a cryptographically secure random bearer token
  async fn generate(&self) -> Result<PlainTextToken, AuthError>;
}

/// Source of the current time
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}
