use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{LocalizedText, Period};

/// A showcased piece of work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
  pub id: Uuid,
  /// URL-safe unique identifier
  pub slug: String,
  pub title: LocalizedText,
  pub description: LocalizedText,
  pub image_url: Option<String>,
  pub technologies: Vec<String>,
  pub repository_url: Option<String>,
  pub live_url: Option<String>,
  /// Shown on the landing page
  pub featured: bool,
  /// Ascending display position
  pub sort_order: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A job held, as listed on the CV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
  pub id: Uuid,
  pub company: String,
  pub position: LocalizedText,
  pub description: LocalizedText,
  pub location: Option<String>,
  /// Free-form period start such as "Enero 2020"
  pub start_date: String,
  /// Free-form period end; absent or "Actualidad" while ongoing
  pub end_date: Option<String>,
}

impl Experience {
  pub fn period(&self) -> Period {
    Period::parse(&self.start_date, self.end_date.as_deref())
  }
}

/// A course of study, as listed on the CV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
  pub id: Uuid,
  pub institution: String,
  pub degree: LocalizedText,
  pub description: LocalizedText,
  pub start_date: String,
  pub end_date: Option<String>,
}

impl Education {
  pub fn period(&self) -> Period {
    Period::parse(&self.start_date, self.end_date.as_deref())
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
  pub id: Uuid,
  pub name: String,
  pub category: String,
  /// Proficiency from 0 to 100
  pub level: u8,
  pub icon: Option<String>,
  pub sort_order: i32,
}

/// Skills sharing a category, in display order
#[derive(Debug, Clone)]
pub struct SkillGroup {
  pub category: String,
  pub skills: Vec<Skill>,
}
