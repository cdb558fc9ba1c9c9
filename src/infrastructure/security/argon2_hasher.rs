use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;

use crate::domain::auth::errors::{AuthError, HashError};
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};

/// Argon2id password hasher implementation
///
/// Default parameters:
/// - Memory cost: 19 MiB (19456 KiB)
/// - Time cost: 2 iterations
/// - Parallelism: 1 thread
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
  /// Creates a new Argon2PasswordHasher with the recommended parameters
  pub fn new() -> Result<Self, AuthError> {
    Self::with_params(19456, 2, 1)
  }

  /// Creates a hasher with explicit cost parameters
  ///
  /// Verification reads the parameters from the stored hash, so hashes
  /// produced with other costs still verify.
  pub fn with_params(
    memory_cost_kib: u32,
    time_cost: u32,
    parallelism: u32,
  ) -> Result<Self, AuthError> {
    let params = Params::new(memory_cost_kib, time_cost, parallelism, Some(32)).map_err(|e| {
      AuthError::Hash(HashError::HashingFailed(format!(
        "Failed to create Argon2 params: {}",
        e
      )))
    })?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    Ok(Self { argon2 })
  }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  /// Hashes a plain text password using Argon2id
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);

    let hash = self
      .argon2
      .hash_password(password.as_str().as_bytes(), &salt)
      .map_err(|e| {
        AuthError::Hash(HashError::HashingFailed(format!(
          "Failed to hash password: {}",
          e
        )))
      })?;

    PasswordHash::from_hash(hash.to_string()).map_err(|e| {
      AuthError::Hash(HashError::HashingFailed(format!(
        "Invalid hash format: {}",
        e
      )))
    })
  }

  /// Verifies a plain text password against a hashed password
  ///
  /// `verify_password` compares in constant time.
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError> {
    let parsed_hash = Argon2PasswordHash::new(hashed_password.as_str()).map_err(|e| {
      AuthError::Hash(HashError::VerificationFailed(format!(
        "Invalid hash format: {}",
        e
      )))
    })?;

    match self
      .argon2
      .verify_password(password.as_str().as_bytes(), &parsed_hash)
    {
      Ok(_) => Ok(true),
      Err(argon2::password_hash::Error::Password) => Ok(false),
      Err(e) => Err(AuthError::Hash(HashError::VerificationFailed(format!(
        "Password verification failed: {}",
        e
      )))),
    }
  }
}
