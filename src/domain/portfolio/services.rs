use std::sync::Arc;

use super::entities::{Education, Experience, Project, Skill, SkillGroup};
use super::errors::PortfolioError;
use super::ports::PortfolioRepository;

/// Read side of the public portfolio
pub struct PortfolioService {
  repo: Arc<dyn PortfolioRepository>,
}

impl PortfolioService {
  pub fn new(repo: Arc<dyn PortfolioRepository>) -> Self {
    Self { repo }
  }

  /// Projects in ascending sort order
  pub async fn list_projects(&self, featured_only: bool) -> Result<Vec<Project>, PortfolioError> {
    let mut projects = self.repo.list_projects(featured_only).await?;
    projects.sort_by_key(|project| project.sort_order);
    Ok(projects)
  }

  pub async fn get_project(&self, slug: &str) -> Result<Project, PortfolioError> {
    self
      .repo
      .find_project_by_slug(slug)
      .await?
      .ok_or_else(|| PortfolioError::ProjectNotFound(slug.to_string()))
  }

  /// Experience entries, most recent first
  pub async fn list_experiences(&self) -> Result<Vec<Experience>, PortfolioError> {
    let mut experiences = self.repo.list_experiences().await?;
    experiences.sort_by(|a, b| a.period().recency_cmp(&b.period()));
    Ok(experiences)
  }

  /// Education entries, most recent first
  pub async fn list_education(&self) -> Result<Vec<Education>, PortfolioError> {
    let mut education = self.repo.list_education().await?;
    education.sort_by(|a, b| a.period().recency_cmp(&b.period()));
    Ok(education)
  }

  /// Skills grouped by category; groups keep the order in which their
  /// category first appears
  pub async fn list_skills(&self) -> Result<Vec<SkillGroup>, PortfolioError> {
    let skills = self.repo.list_skills().await?;
    Ok(group_skills(skills))
  }
}

fn group_skills(skills: Vec<Skill>) -> Vec<SkillGroup> {
  let mut groups: Vec<SkillGroup> = Vec::new();

  for skill in skills {
    match groups
      .iter_mut()
      .find(|group| group.category == skill.category)
    {
      Some(group) => group.skills.push(skill),
      None => groups.push(SkillGroup {
        category: skill.category.clone(),
        skills: vec![skill],
      }),
    }
  }

  groups
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{InMemoryPortfolioRepository, education, experience, project, skill};

  fn service(repo: InMemoryPortfolioRepository) -> PortfolioService {
    PortfolioService::new(Arc::new(repo))
  }

  #[tokio::test]
  async fn test_list_projects_sorted_and_filtered() {
    let repo = InMemoryPortfolioRepository::default();
    repo.add_project(project("third", 3, true));
    repo.add_project(project("first", 1, false));
    repo.add_project(project("second", 2, true));
    let service = service(repo);

    let all: Vec<String> = service
      .list_projects(false)
      .await
      .unwrap()
      .into_iter()
      .map(|p| p.slug)
      .collect();
    let featured: Vec<String> = service
      .list_projects(true)
      .await
      .unwrap()
      .into_iter()
      .map(|p| p.slug)
      .collect();

    assert_eq!(all, vec!["first", "second", "third"]);
    assert_eq!(featured, vec!["second", "third"]);
  }

  #[tokio::test]
  async fn test_get_project_not_found() {
    let service = service(InMemoryPortfolioRepository::default());

    let result = service.get_project("missing").await;

    assert!(matches!(result, Err(PortfolioError::ProjectNotFound(slug)) if slug == "missing"));
  }

  #[tokio::test]
  async fn test_experiences_most_recent_first() {
    let repo = InMemoryPortfolioRepository::default();
    repo.add_experience(experience("Old Co", "Enero 2012", Some("Junio 2015")));
    repo.add_experience(experience("Mystery", "quién sabe", Some("tampoco")));
    repo.add_experience(experience("Now Co", "Marzo 2021", Some("Actualidad")));
    repo.add_experience(experience("Mid Co", "Julio 2015", Some("Febrero 2021")));
    let service = service(repo);

    let companies: Vec<String> = service
      .list_experiences()
      .await
      .unwrap()
      .into_iter()
      .map(|e| e.company)
      .collect();

    assert_eq!(companies, vec!["Now Co", "Mid Co", "Old Co", "Mystery"]);
  }

  #[tokio::test]
  async fn test_education_ongoing_first() {
    let repo = InMemoryPortfolioRepository::default();
    repo.add_education(education("Bachiller", "2005", Some("2010")));
    repo.add_education(education("Maestría", "2022", None));
    let service = service(repo);

    let institutions: Vec<String> = service
      .list_education()
      .await
      .unwrap()
      .into_iter()
      .map(|e| e.institution)
      .collect();

    assert_eq!(institutions, vec!["Maestría", "Bachiller"]);
  }

  #[tokio::test]
  async fn test_skills_grouped_in_first_appearance_order() {
    let repo = InMemoryPortfolioRepository::default();
    repo.add_skill(skill("Rust", "Backend", 1));
    repo.add_skill(skill("Vue", "Frontend", 2));
    repo.add_skill(skill("Postgres", "Backend", 3));
    let service = service(repo);

    let groups = service.list_skills().await.unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].category, "Backend");
    assert_eq!(groups[0].skills.len(), 2);
    assert_eq!(groups[1].category, "Frontend");
  }
}
