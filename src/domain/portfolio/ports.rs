use async_trait::async_trait;

use super::entities::{Education, Experience, Project, Skill};
use super::errors::PortfolioError;

/// Read access to published portfolio content
#[async_trait]
pub trait PortfolioRepository: Send + Sync {
  /// Lists projects by ascending sort order, optionally only featured ones
  async fn list_projects(&self, featured_only: bool) -> Result<Vec<Project>, PortfolioError>;

  /// Finds a project by its slug
  async fn find_project_by_slug(&self, slug: &str) -> Result<Option<Project>, PortfolioError>;

  /// Lists every experience entry, in storage order
  async fn list_experiences(&self) -> Result<Vec<Experience>, PortfolioError>;

  /// Lists every education entry, in storage order
  async fn list_education(&self) -> Result<Vec<Education>, PortfolioError>;

  /// Lists skills by ascending sort order
  async fn list_skills(&self) -> Result<Vec<Skill>, PortfolioError>;
}
