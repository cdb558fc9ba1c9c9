use std::sync::Arc;

use super::views::ExperienceView;
use crate::domain::portfolio::errors::PortfolioError;
use crate::domain::portfolio::services::PortfolioService;
use crate::domain::portfolio::value_objects::Locale;

/// Use case for listing work experience, most recent first
pub struct ListExperiencesUseCase {
  portfolio_service: Arc<PortfolioService>,
}

impl ListExperiencesUseCase {
  pub fn new(portfolio_service: Arc<PortfolioService>) -> Self {
    Self { portfolio_service }
  }

  pub async fn execute(&self, locale: Locale) -> Result<Vec<ExperienceView>, PortfolioError> {
    let experiences = self.portfolio_service.list_experiences().await?;

    Ok(
      experiences
        .into_iter()
        .map(|experience| ExperienceView::localized(experience, locale))
        .collect(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{InMemoryPortfolioRepository, experience};

  #[tokio::test]
  async fn test_marks_current_position() {
    let repo = InMemoryPortfolioRepository::default();
    repo.add_experience(experience("Before", "2015", Some("2019")));
    repo.add_experience(experience("Now", "Enero 2020", Some("Actualidad")));
    let use_case = ListExperiencesUseCase::new(Arc::new(PortfolioService::new(Arc::new(repo))));

    let views = use_case.execute(Locale::En).await.unwrap();

    assert_eq!(views[0].company, "Now");
    assert!(views[0].current);
    assert_eq!(views[0].position, "Developer");
    assert!(!views[1].current);
  }
}
