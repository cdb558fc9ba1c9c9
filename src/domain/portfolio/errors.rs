use thiserror::Error;

use crate::domain::auth::errors::RepositoryError;

/// Errors raised while reading public portfolio content
#[derive(Debug, Error)]
pub enum PortfolioError {
  #[error("Project not found: {0}")]
  ProjectNotFound(String),

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for PortfolioError {
  fn from(error: sqlx::Error) -> Self {
    PortfolioError::Repository(RepositoryError::from(error))
  }
}
