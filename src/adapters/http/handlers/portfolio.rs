use actix_web::{HttpResponse, web};
use std::sync::Arc;

use crate::adapters::http::{
  dtos::ProjectsQuery,
  errors::{ApiError, LocalizeErr},
  middleware::RequestLocale,
};
use crate::application::portfolio::{
  GetProjectUseCase, ListEducationUseCase, ListExperiencesUseCase, ListProjectsUseCase,
  ListSkillsUseCase,
};

/// GET /api/projects[?featured=true]
pub async fn list_projects_handler(
  query: web::Query<ProjectsQuery>,
  use_case: web::Data<Arc<ListProjectsUseCase>>,
  locale: RequestLocale,
) -> Result<HttpResponse, ApiError> {
  let locale = locale.locale();
  let projects = use_case
    .execute(query.featured, locale)
    .await
    .localize_err(locale)?;

  Ok(HttpResponse::Ok().json(projects))
}

/// GET /api/projects/{slug}
pub async fn get_project_handler(
  slug: web::Path<String>,
  use_case: web::Data<Arc<GetProjectUseCase>>,
  locale: RequestLocale,
) -> Result<HttpResponse, ApiError> {
  let locale = locale.locale();
  let project = use_case.execute(&slug, locale).await.localize_err(locale)?;

  Ok(HttpResponse::Ok().json(project))
}

/// GET /api/experiences
pub async fn list_experiences_handler(
  use_case: web::Data<Arc<ListExperiencesUseCase>>,
  locale: RequestLocale,
) -> Result<HttpResponse, ApiError> {
  let locale = locale.locale();
  let experiences = use_case.execute(locale).await.localize_err(locale)?;

  Ok(HttpResponse::Ok().json(experiences))
}

/// GET /api/education
pub async fn list_education_handler(
  use_case: web::Data<Arc<ListEducationUseCase>>,
  locale: RequestLocale,
) -> Result<HttpResponse, ApiError> {
  let locale = locale.locale();
  let education = use_case.execute(locale).await.localize_err(locale)?;

  Ok(HttpResponse::Ok().json(education))
}

/// GET /api/skills
///
/// Skill names are not translated; only error messages follow the locale.
pub async fn list_skills_handler(
  use_case: web::Data<Arc<ListSkillsUseCase>>,
  locale: RequestLocale,
) -> Result<HttpResponse, ApiError> {
  let groups = use_case.execute().await.localize_err(locale.locale())?;

  Ok(HttpResponse::Ok().json(groups))
}
