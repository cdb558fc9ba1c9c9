use std::sync::Arc;

use super::views::EducationView;
use crate::domain::portfolio::errors::PortfolioError;
use crate::domain::portfolio::services::PortfolioService;
use crate::domain::portfolio::value_objects::Locale;

/// Use case for listing education, most recent first
pub struct ListEducationUseCase {
  portfolio_service: Arc<PortfolioService>,
}

impl ListEducationUseCase {
  pub fn new(portfolio_service: Arc<PortfolioService>) -> Self {
    Self { portfolio_service }
  }

  pub async fn execute(&self, locale: Locale) -> Result<Vec<EducationView>, PortfolioError> {
    let education = self.portfolio_service.list_education().await?;

    Ok(
      education
        .into_iter()
        .map(|entry| EducationView::localized(entry, locale))
        .collect(),
    )
  }
}
