use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::portfolio::{
  entities::{Education, Experience, Project, Skill},
  errors::PortfolioError,
  ports::PortfolioRepository,
  value_objects::LocalizedText,
};

/// PostgreSQL implementation of the PortfolioRepository trait
pub struct PostgresPortfolioRepository {
  pool: PgPool,
}

impl PostgresPortfolioRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
  id: Uuid,
  slug: String,
  title: String,
  title_en: Option<String>,
  description: String,
  description_en: Option<String>,
  image_url: Option<String>,
  technologies: Vec<String>,
  repository_url: Option<String>,
  live_url: Option<String>,
  featured: bool,
  sort_order: i32,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
  fn from(row: ProjectRow) -> Self {
    Project {
      id: row.id,
      slug: row.slug,
      title: LocalizedText::new(row.title, row.title_en),
      description: LocalizedText::new(row.description, row.description_en),
      image_url: row.image_url,
      technologies: row.technologies,
      repository_url: row.repository_url,
      live_url: row.live_url,
      featured: row.featured,
      sort_order: row.sort_order,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct ExperienceRow {
  id: Uuid,
  company: String,
  position: String,
  position_en: Option<String>,
  description: String,
  description_en: Option<String>,
  location: Option<String>,
  start_date: String,
  end_date: Option<String>,
}

impl From<ExperienceRow> for Experience {
  fn from(row: ExperienceRow) -> Self {
    Experience {
      id: row.id,
      company: row.company,
      position: LocalizedText::new(row.position, row.position_en),
      description: LocalizedText::new(row.description, row.description_en),
      location: row.location,
      start_date: row.start_date,
      end_date: row.end_date,
    }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct EducationRow {
  id: Uuid,
  institution: String,
  degree: String,
  degree_en: Option<String>,
  description: String,
  description_en: Option<String>,
  start_date: String,
  end_date: Option<String>,
}

impl From<EducationRow> for Education {
  fn from(row: EducationRow) -> Self {
    Education {
      id: row.id,
      institution: row.institution,
      degree: LocalizedText::new(row.degree, row.degree_en),
      description: LocalizedText::new(row.description, row.description_en),
      start_date: row.start_date,
      end_date: row.end_date,
    }
  }
}

#[derive(Debug, sqlx::FromRow)]
struct SkillRow {
  id: Uuid,
  name: String,
  category: String,
  level: i16,
  icon: Option<String>,
  sort_order: i32,
}

impl From<SkillRow> for Skill {
  fn from(row: SkillRow) -> Self {
    Skill {
      id: row.id,
      name: row.name,
      category: row.category,
      // The table constrains level to 0..=100
      level: row.level.clamp(0, 100) as u8,
      icon: row.icon,
      sort_order: row.sort_order,
    }
  }
}

#[async_trait]
impl PortfolioRepository for PostgresPortfolioRepository {
  async fn list_projects(&self, featured_only: bool) -> Result<Vec<Project>, PortfolioError> {
    let rows = sqlx::query_as::<_, ProjectRow>(
      r#"
            SELECT
                id, slug, title, title_en, description, description_en,
                image_url, technologies, repository_url, live_url,
                featured, sort_order, created_at, updated_at
            FROM projects
            WHERE featured OR NOT $1
            ORDER BY sort_order ASC, created_at DESC
            "#,
    )
    .bind(featured_only)
    .fetch_all(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to list projects: {}", e);
      PortfolioError::from(e)
    })?;

    Ok(rows.into_iter().map(Into::into).collect())
  }

  async fn find_project_by_slug(&self, slug: &str) -> Result<Option<Project>, PortfolioError> {
    let row = sqlx::query_as::<_, ProjectRow>(
      r#"
            SELECT
                id, slug, title, title_en, description, description_en,
                image_url, technologies, repository_url, live_url,
                featured, sort_order, created_at, updated_at
            FROM projects
            WHERE slug = $1
            "#,
    )
    .bind(slug)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find project {}: {}", slug, e);
      PortfolioError::from(e)
    })?;

    Ok(row.map(Into::into))
  }

  async fn list_experiences(&self) -> Result<Vec<Experience>, PortfolioError> {
    let rows = sqlx::query_as::<_, ExperienceRow>(
      r#"
            SELECT
                id, company, position, position_en, description, description_en,
                location, start_date, end_date
            FROM experiences
            ORDER BY created_at DESC
            "#,
    )
    .fetch_all(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to list experiences: {}", e);
      PortfolioError::from(e)
    })?;

    Ok(rows.into_iter().map(Into::into).collect())
  }

  async fn list_education(&self) -> Result<Vec<Education>, PortfolioError> {
    let rows = sqlx::query_as::<_, EducationRow>(
      r#"
            SELECT
                id, institution, degree, degree_en, description, description_en,
                start_date, end_date
            FROM educations
            ORDER BY created_at DESC
            "#,
    )
    .fetch_all(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to list education: {}", e);
      PortfolioError::from(e)
    })?;

    Ok(rows.into_iter().map(Into::into).collect())
  }

  async fn list_skills(&self) -> Result<Vec<Skill>, PortfolioError> {
    let rows = sqlx::query_as::<_, SkillRow>(
      r#"
            SELECT id, name, category, level, icon, sort_order
            FROM skills
            ORDER BY sort_order ASC, name ASC
            "#,
    )
    .fetch_all(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to list skills: {}", e);
      PortfolioError::from(e)
    })?;

    Ok(rows.into_iter().map(Into::into).collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::postgres::test_db::setup_test_db;

  async fn insert_project(pool: &PgPool, slug: &str, featured: bool, sort_order: i32) {
    sqlx::query(
      r#"
            INSERT INTO projects (id, slug, title, title_en, technologies, featured, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
    )
    .bind(Uuid::new_v4())
    .bind(slug)
    .bind(format!("Proyecto {}", slug))
    .bind(Some(format!("Project {}", slug)))
    .bind(vec!["Rust".to_string(), "Vue".to_string()])
    .bind(featured)
    .bind(sort_order)
    .execute(pool)
    .await
    .unwrap();
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_list_projects_featured_filter() {
    let (pool, _container) = setup_test_db().await;
    insert_project(&pool, "beta", true, 2).await;
    insert_project(&pool, "alpha", false, 1).await;
    let repo = PostgresPortfolioRepository::new(pool);

    let all = repo.list_projects(false).await.unwrap();
    let featured = repo.list_projects(true).await.unwrap();

    assert_eq!(
      all.iter().map(|p| p.slug.as_str()).collect::<Vec<_>>(),
      vec!["alpha", "beta"]
    );
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].technologies, vec!["Rust", "Vue"]);
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_find_project_by_slug() {
    let (pool, _container) = setup_test_db().await;
    insert_project(&pool, "portfolio", true, 1).await;
    let repo = PostgresPortfolioRepository::new(pool);

    let found = repo.find_project_by_slug("portfolio").await.unwrap().unwrap();
    let missing = repo.find_project_by_slug("nope").await.unwrap();

    assert_eq!(found.title.en.as_deref(), Some("Project portfolio"));
    assert!(missing.is_none());
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_list_skills_by_sort_order() {
    let (pool, _container) = setup_test_db().await;
    for (name, category, order) in [("Vue", "Frontend", 2), ("Rust", "Backend", 1)] {
      sqlx::query(
        "INSERT INTO skills (id, name, category, level, sort_order) VALUES ($1, $2, $3, 90, $4)",
      )
      .bind(Uuid::new_v4())
      .bind(name)
      .bind(category)
      .bind(order)
      .execute(&pool)
      .await
      .unwrap();
    }
    let repo = PostgresPortfolioRepository::new(pool);

    let skills = repo.list_skills().await.unwrap();

    assert_eq!(skills[0].name, "Rust");
    assert_eq!(skills[0].level, 90);
  }
}
