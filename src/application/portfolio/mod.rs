//! Public portfolio use cases

mod get_project;
mod list_education;
mod list_experiences;
mod list_projects;
mod list_skills;
mod views;

pub use get_project::GetProjectUseCase;
pub use list_education::ListEducationUseCase;
pub use list_experiences::ListExperiencesUseCase;
pub use list_projects::ListProjectsUseCase;
pub use list_skills::ListSkillsUseCase;
pub use views::{EducationView, ExperienceView, ProjectView, SkillGroupView, SkillView};
