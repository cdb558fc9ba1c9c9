use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::auth::entities::User;

/// Public projection of an admin identity; never carries the password hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminProfile {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for AdminProfile {
  fn from(user: &User) -> Self {
    Self {
      id: user.id,
      name: user.name.clone(),
      email: user.email.clone(),
      last_login_at: user.last_login_at,
    }
  }
}
