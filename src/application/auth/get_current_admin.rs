use super::admin_profile::AdminProfile;
use super::authenticate_admin::AuthenticatedAdmin;

/// Use case for reading the signed-in admin
///
/// The admin has already been resolved from the bearer token, so this only
/// projects it and touches no store.
#[derive(Default)]
pub struct GetCurrentAdminUseCase;

impl GetCurrentAdminUseCase {
  pub fn new() -> Self {
    Self
  }

  pub fn execute(&self, admin: &AuthenticatedAdmin) -> AdminProfile {
    AdminProfile::from(&admin.user)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::entities::User;
  use chrono::Utc;
  use uuid::Uuid;

  #[test]
  fn test_projects_user_without_secrets() {
    let mut user = User::new(
      "Admin".to_string(),
      "admin@test.com".to_string(),
      "$argon2id$secret".to_string(),
      true,
    );
    user.last_login_at = Some(Utc::now());
    let admin = AuthenticatedAdmin {
      user: user.clone(),
      token_id: Uuid::new_v4(),
      token_expires_at: Utc::now(),
    };

    let profile = GetCurrentAdminUseCase::new().execute(&admin);

    assert_eq!(profile.id, user.id);
    assert_eq!(profile.email, "admin@test.com");
    assert_eq!(profile.last_login_at, user.last_login_at);
  }
}
