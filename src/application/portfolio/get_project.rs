use std::sync::Arc;

use super::views::ProjectView;
use crate::domain::portfolio::errors::PortfolioError;
use crate::domain::portfolio::services::PortfolioService;
use crate::domain::portfolio::value_objects::Locale;

/// Use case for showing one project
pub struct GetProjectUseCase {
  portfolio_service: Arc<PortfolioService>,
}

impl GetProjectUseCase {
  pub fn new(portfolio_service: Arc<PortfolioService>) -> Self {
    Self { portfolio_service }
  }

  /// # Errors
  /// Returns `PortfolioError::ProjectNotFound` for an unknown slug
  pub async fn execute(&self, slug: &str, locale: Locale) -> Result<ProjectView, PortfolioError> {
    let project = self.portfolio_service.get_project(slug).await?;

    Ok(ProjectView::localized(project, locale))
  }
}
