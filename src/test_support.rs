//! In-memory fakes shared by unit tests across layers

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::auth::entities::{AccessToken, User};
use crate::domain::auth::errors::{AuthError, RepositoryError};
use crate::domain::auth::ports::{AccessTokenRepository, Clock, PasswordHasher, UserRepository};
use crate::domain::auth::services::{AuthService, AuthServiceConfig};
use crate::domain::auth::value_objects::{
  LoginIdentifier, Origin, Password, PlainTextToken, TokenHash,
};
use crate::domain::portfolio::entities::{Education, Experience, Project, Skill};
use crate::domain::portfolio::errors::PortfolioError;
use crate::domain::portfolio::ports::PortfolioRepository;
use crate::domain::portfolio::value_objects::LocalizedText;
use crate::infrastructure::cache::InMemoryRateLimiter;
use crate::infrastructure::security::{Argon2PasswordHasher, SecureTokenGenerator};

pub const ADMIN_EMAIL: &str = "admin@test.com";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";
pub const TEST_ORIGIN: &str = "127.0.0.1";

/// Clock that only moves when told to
pub struct ManualClock {
  now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
  pub fn at(now: DateTime<Utc>) -> Self {
    Self {
      now: Mutex::new(now),
    }
  }

  pub fn advance(&self, by: Duration) {
    let mut now = self.now.lock().unwrap();
    *now += by;
  }
}

impl Default for ManualClock {
  fn default() -> Self {
    Self::at(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap())
  }
}

impl Clock for ManualClock {
  fn now(&self) -> DateTime<Utc> {
    *self.now.lock().unwrap()
  }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
  users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
  pub fn get(&self, id: Uuid) -> Option<User> {
    self.users.lock().unwrap().get(&id).cloned()
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let mut users = self.users.lock().unwrap();
    let email = user.email.to_lowercase();
    if users.values().any(|u| u.email.to_lowercase() == email) {
      return Err(AuthError::Repository(RepositoryError::DuplicateKey(
        "Email already exists".to_string(),
      )));
    }
    users.insert(user.id, user.clone());
    Ok(user)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    Ok(self.get(id))
  }

  async fn find_by_login(&self, identifier: &LoginIdentifier) -> Result<Option<User>, AuthError> {
    let normalized = identifier.normalized();
    Ok(
      self
        .users
        .lock()
        .unwrap()
        .values()
        .find(|u| u.email.to_lowercase() == normalized)
        .cloned(),
    )
  }

  async fn update(&self, user: User) -> Result<User, AuthError> {
    let mut users = self.users.lock().unwrap();
    if !users.contains_key(&user.id) {
      return Err(AuthError::Repository(RepositoryError::NotFound));
    }
    users.insert(user.id, user.clone());
    Ok(user)
  }
}

#[derive(Default)]
pub struct InMemoryAccessTokenRepository {
  tokens: Mutex<HashMap<Uuid, AccessToken>>,
}

impl InMemoryAccessTokenRepository {
  pub fn is_empty(&self) -> bool {
    self.tokens.lock().unwrap().is_empty()
  }

  /// Stores a token as-is, bypassing the login flow
  pub fn insert(&self, token: AccessToken) {
    self.tokens.lock().unwrap().insert(token.id, token);
  }
}

#[async_trait]
impl AccessTokenRepository for InMemoryAccessTokenRepository {
  async fn create(&self, token: AccessToken) -> Result<AccessToken, AuthError> {
    self.insert(token.clone());
    Ok(token)
  }

  async fn find_by_token_hash(
    &self,
    token_hash: &TokenHash,
  ) -> Result<Option<AccessToken>, AuthError> {
    Ok(
      self
        .tokens
        .lock()
        .unwrap()
        .values()
        .find(|t| &t.token_hash == token_hash)
        .cloned(),
    )
  }

  async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<AccessToken>, AuthError> {
    Ok(
      self
        .tokens
        .lock()
        .unwrap()
        .values()
        .filter(|t| t.user_id == user_id)
        .cloned()
        .collect(),
    )
  }

  async fn touch(&self, token_id: Uuid, at: DateTime<Utc>) -> Result<(), AuthError> {
    if let Some(token) = self.tokens.lock().unwrap().get_mut(&token_id) {
      token.last_used_at = Some(at);
    }
    Ok(())
  }

  async fn delete(&self, token_id: Uuid) -> Result<(), AuthError> {
    self.tokens.lock().unwrap().remove(&token_id);
    Ok(())
  }

  async fn delete_all_for_user(&self, user_id: Uuid) -> Result<u64, AuthError> {
    let mut tokens = self.tokens.lock().unwrap();
    let before = tokens.len();
    tokens.retain(|_, t| t.user_id != user_id);
    Ok((before - tokens.len()) as u64)
  }
}

/// An `AuthService` wired to in-memory stores and a manual clock
pub struct AuthHarness {
  pub service: Arc<AuthService>,
  pub users: Arc<InMemoryUserRepository>,
  pub tokens: Arc<InMemoryAccessTokenRepository>,
  pub limiter: Arc<InMemoryRateLimiter>,
  pub clock: Arc<ManualClock>,
  pub hasher: Arc<Argon2PasswordHasher>,
}

impl AuthHarness {
  pub async fn new() -> Self {
    Self::with_config(AuthServiceConfig::default()).await
  }

  pub async fn with_config(config: AuthServiceConfig) -> Self {
    let clock = Arc::new(ManualClock::default());
    let users = Arc::new(InMemoryUserRepository::default());
    let tokens = Arc::new(InMemoryAccessTokenRepository::default());
    let limiter = Arc::new(InMemoryRateLimiter::new(clock.clone()));
    let hasher = Arc::new(Argon2PasswordHasher::with_params(1024, 1, 1).unwrap());

    let service = Arc::new(AuthService::new(
      users.clone(),
      tokens.clone(),
      limiter.clone(),
      hasher.clone(),
      Arc::new(SecureTokenGenerator::new()),
      clock.clone(),
      config,
    ));

    Self {
      service,
      users,
      tokens,
      limiter,
      clock,
      hasher,
    }
  }

  pub async fn seed_user(&self, email: &str, password: &str, is_admin: bool) -> User {
    let hash = self
      .hasher
      .hash(&Password::new(password).unwrap())
      .await
      .unwrap();
    let user = User::new(
      "Test User".to_string(),
      email.to_string(),
      hash.into_inner(),
      is_admin,
    );
    self.users.create(user).await.unwrap()
  }

  /// Logs in through the service from a fixed origin
  pub async fn login(
    &self,
    email: &str,
    password: &str,
  ) -> Result<(User, AccessToken, PlainTextToken), AuthError> {
    self
      .service
      .attempt_login(
        LoginIdentifier::new(email)?,
        Password::new(password)?,
        Origin::new(TEST_ORIGIN)?,
      )
      .await
  }
}

#[derive(Default)]
pub struct InMemoryPortfolioRepository {
  projects: Mutex<Vec<Project>>,
  experiences: Mutex<Vec<Experience>>,
  education: Mutex<Vec<Education>>,
  skills: Mutex<Vec<Skill>>,
}

impl InMemoryPortfolioRepository {
  pub fn add_project(&self, project: Project) {
    self.projects.lock().unwrap().push(project);
  }

  pub fn add_experience(&self, experience: Experience) {
    self.experiences.lock().unwrap().push(experience);
  }

  pub fn add_education(&self, education: Education) {
    self.education.lock().unwrap().push(education);
  }

  pub fn add_skill(&self, skill: Skill) {
    self.skills.lock().unwrap().push(skill);
  }
}

#[async_trait]
impl PortfolioRepository for InMemoryPortfolioRepository {
  async fn list_projects(&self, featured_only: bool) -> Result<Vec<Project>, PortfolioError> {
    let mut projects: Vec<Project> = self
      .projects
      .lock()
      .unwrap()
      .iter()
      .filter(|p| !featured_only || p.featured)
      .cloned()
      .collect();
    projects.sort_by_key(|p| p.sort_order);
    Ok(projects)
  }

  async fn find_project_by_slug(&self, slug: &str) -> Result<Option<Project>, PortfolioError> {
    Ok(
      self
        .projects
        .lock()
        .unwrap()
        .iter()
        .find(|p| p.slug == slug)
        .cloned(),
    )
  }

  async fn list_experiences(&self) -> Result<Vec<Experience>, PortfolioError> {
    Ok(self.experiences.lock().unwrap().clone())
  }

  async fn list_education(&self) -> Result<Vec<Education>, PortfolioError> {
    Ok(self.education.lock().unwrap().clone())
  }

  async fn list_skills(&self) -> Result<Vec<Skill>, PortfolioError> {
    let mut skills = self.skills.lock().unwrap().clone();
    skills.sort_by_key(|s| s.sort_order);
    Ok(skills)
  }
}

pub fn project(slug: &str, sort_order: i32, featured: bool) -> Project {
  let now = Utc::now();
  Project {
    id: Uuid::new_v4(),
    slug: slug.to_string(),
    title: LocalizedText::new(format!("Proyecto {}", slug), Some(format!("Project {}", slug))),
    description: LocalizedText::new("Descripción", None),
    image_url: None,
    technologies: vec!["Rust".to_string()],
    repository_url: None,
    live_url: None,
    featured,
    sort_order,
    created_at: now,
    updated_at: now,
  }
}

pub fn experience(company: &str, start: &str, end: Option<&str>) -> Experience {
  Experience {
    id: Uuid::new_v4(),
    company: company.to_string(),
    position: LocalizedText::new("Desarrollador", Some("Developer".to_string())),
    description: LocalizedText::new("", None),
    location: None,
    start_date: start.to_string(),
    end_date: end.map(str::to_string),
  }
}

pub fn education(institution: &str, start: &str, end: Option<&str>) -> Education {
  Education {
    id: Uuid::new_v4(),
    institution: institution.to_string(),
    degree: LocalizedText::new("Ingeniería", Some("Engineering".to_string())),
    description: LocalizedText::new("", None),
    start_date: start.to_string(),
    end_date: end.map(str::to_string),
  }
}

pub fn skill(name: &str, category: &str, sort_order: i32) -> Skill {
  Skill {
    id: Uuid::new_v4(),
    name: name.to_string(),
    category: category.to_string(),
    level: 80,
    icon: None,
    sort_order,
  }
}
