use thiserror::Error;

use super::value_objects::ValueObjectError;

/// Main authentication error type
#[derive(Debug, Error)]
pub enum AuthError {
  /// Unknown identifier, wrong password, or an identity without admin rights.
  /// All three share this variant so callers cannot tell them apart.
  #[error("Invalid credentials provided")]
  InvalidCredentials,

  #[error("Too many login attempts, available again in {available_in} seconds")]
  RateLimited { available_in: u64 },

  #[error("Missing, unknown or expired access token")]
  Unauthenticated,

  #[error("Access token does not grant the required ability")]
  Forbidden,

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Hash error: {0}")]
  Hash(#[from] HashError),

  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("Value object error: {0}")]
  ValueObject(#[from] ValueObjectError),
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Transaction failed: {0}")]
  TransactionFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),

  #[error("Cache error: {0}")]
  Cache(String),
}

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Failed to hash password: {0}")]
  HashingFailed(String),

  #[error("Failed to verify password: {0}")]
  VerificationFailed(String),

  #[error("Invalid hash format")]
  InvalidFormat,
}

/// Input validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
  #[error("Invalid field: {field}")]
  InvalidField { field: String },

  #[error("Missing required field: {field}")]
  MissingField { field: String },
}

// Automatic conversions from external error types

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::Error> for AuthError {
  fn from(error: sqlx::Error) -> Self {
    AuthError::Repository(RepositoryError::from(error))
  }
}

impl From<redis::RedisError> for RepositoryError {
  fn from(error: redis::RedisError) -> Self {
    if error.is_connection_refusal() || error.is_connection_dropped() || error.is_timeout() {
      RepositoryError::ConnectionFailed(error.to_string())
    } else {
      RepositoryError::Cache(error.to_string())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rate_limited_message_carries_seconds() {
    let error = AuthError::RateLimited { available_in: 42 };

    assert!(error.to_string().contains("42 seconds"));
  }

  #[test]
  fn test_sqlx_row_not_found_maps_to_not_found() {
    let error: AuthError = sqlx::Error::RowNotFound.into();

    assert!(matches!(
      error,
      AuthError::Repository(RepositoryError::NotFound)
    ));
  }
}
