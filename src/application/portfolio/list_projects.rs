use std::sync::Arc;

use super::views::ProjectView;
use crate::domain::portfolio::errors::PortfolioError;
use crate::domain::portfolio::services::PortfolioService;
use crate::domain::portfolio::value_objects::Locale;

/// Use case for listing projects
pub struct ListProjectsUseCase {
  portfolio_service: Arc<PortfolioService>,
}

impl ListProjectsUseCase {
  pub fn new(portfolio_service: Arc<PortfolioService>) -> Self {
    Self { portfolio_service }
  }

  pub async fn execute(
    &self,
    featured_only: bool,
    locale: Locale,
  ) -> Result<Vec<ProjectView>, PortfolioError> {
    let projects = self.portfolio_service.list_projects(featured_only).await?;

    Ok(
      projects
        .into_iter()
        .map(|project| ProjectView::localized(project, locale))
        .collect(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{InMemoryPortfolioRepository, project};

  #[tokio::test]
  async fn test_projects_resolved_to_locale() {
    let repo = InMemoryPortfolioRepository::default();
    repo.add_project(project("site", 1, true));
    let use_case = ListProjectsUseCase::new(Arc::new(PortfolioService::new(Arc::new(repo))));

    let english = use_case.execute(false, Locale::En).await.unwrap();
    let spanish = use_case.execute(false, Locale::Es).await.unwrap();

    assert_eq!(english[0].title, "Project site");
    assert_eq!(spanish[0].title, "Proyecto site");
    // No English description, so Spanish is used
    assert_eq!(english[0].description, "Descripción");
  }
}
