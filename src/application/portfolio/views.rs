use serde::Serialize;

use crate::domain::portfolio::entities::{Education, Experience, Project, Skill, SkillGroup};
use crate::domain::portfolio::value_objects::Locale;

/// A project with its text resolved to one locale
#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
  pub slug: String,
  pub title: String,
  pub description: String,
  pub image_url: Option<String>,
  pub technologies: Vec<String>,
  pub repository_url: Option<String>,
  pub live_url: Option<String>,
  pub featured: bool,
}

impl ProjectView {
  pub fn localized(project: Project, locale: Locale) -> Self {
    Self {
      title: project.title.resolve(locale).to_string(),
      description: project.description.resolve(locale).to_string(),
      slug: project.slug,
      image_url: project.image_url,
      technologies: project.technologies,
      repository_url: project.repository_url,
      live_url: project.live_url,
      featured: project.featured,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExperienceView {
  pub company: String,
  pub position: String,
  pub description: String,
  pub location: Option<String>,
  pub start_date: String,
  pub end_date: Option<String>,
  pub current: bool,
}

impl ExperienceView {
  pub fn localized(experience: Experience, locale: Locale) -> Self {
    let current = experience.period().is_current();
    Self {
      position: experience.position.resolve(locale).to_string(),
      description: experience.description.resolve(locale).to_string(),
      company: experience.company,
      location: experience.location,
      start_date: experience.start_date,
      end_date: experience.end_date,
      current,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct EducationView {
  pub institution: String,
  pub degree: String,
  pub description: String,
  pub start_date: String,
  pub end_date: Option<String>,
  pub current: bool,
}

impl EducationView {
  pub fn localized(education: Education, locale: Locale) -> Self {
    let current = education.period().is_current();
    Self {
      degree: education.degree.resolve(locale).to_string(),
      description: education.description.resolve(locale).to_string(),
      institution: education.institution,
      start_date: education.start_date,
      end_date: education.end_date,
      current,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillView {
  pub name: String,
  pub level: u8,
  pub icon: Option<String>,
}

impl From<Skill> for SkillView {
  fn from(skill: Skill) -> Self {
    Self {
      name: skill.name,
      level: skill.level,
      icon: skill.icon,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillGroupView {
  pub category: String,
  pub skills: Vec<SkillView>,
}

impl From<SkillGroup> for SkillGroupView {
  fn from(group: SkillGroup) -> Self {
    Self {
      category: group.category,
      skills: group.skills.into_iter().map(SkillView::from).collect(),
    }
  }
}
