use std::sync::Arc;

use super::views::SkillGroupView;
use crate::domain::portfolio::errors::PortfolioError;
use crate::domain::portfolio::services::PortfolioService;

/// Use case for listing skills grouped by category
pub struct ListSkillsUseCase {
  portfolio_service: Arc<PortfolioService>,
}

impl ListSkillsUseCase {
  pub fn new(portfolio_service: Arc<PortfolioService>) -> Self {
    Self { portfolio_service }
  }

  pub async fn execute(&self) -> Result<Vec<SkillGroupView>, PortfolioError> {
    let groups = self.portfolio_service.list_skills().await?;

    Ok(groups.into_iter().map(SkillGroupView::from).collect())
  }
}
