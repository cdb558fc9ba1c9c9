use chrono::Duration;
use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

use super::entities::{AccessToken, User};
use super::errors::{AuthError, ValidationError};
use super::ports::{
  AccessTokenRepository, Clock, PasswordHasher, RateLimiter, TokenGenerator, UserRepository,
};
use super::value_objects::{
  LoginIdentifier, Origin, Password, PasswordHash, PlainTextToken, ThrottleKey, TokenAbility,
};

/// Label stored on tokens issued by the admin login
pub const ADMIN_TOKEN_NAME: &str = "admin-panel";

/// Password behind the hash verified for identifiers without a usable hash
const DECOY_PASSWORD: &str = "decoy-password-never-matches";

/// Tunables for the admin login guard
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
  /// Attempts allowed per throttle key within one window
  pub max_attempts: u32,
  /// Length of a throttle window, counted from its first hit
  pub decay_seconds: u64,
  /// Lifetime of an issued access token
  pub token_ttl_minutes: i64,
}

impl Default for AuthServiceConfig {
  fn default() -> Self {
    Self {
      max_attempts: 5,
      decay_seconds: 3600,
      token_ttl_minutes: 60,
    }
  }
}

impl AuthServiceConfig {
  /// Rejects tunables that would lock every admin out or issue dead tokens
  pub fn validate(&self) -> Result<(), ValidationError> {
    let invalid = if self.max_attempts == 0 {
      Some("max_attempts")
    } else if self.decay_seconds == 0 {
      Some("decay_seconds")
    } else if self.token_ttl_minutes <= 0 {
      Some("token_ttl_minutes")
    } else {
      None
    };

    match invalid {
      Some(field) => Err(ValidationError::InvalidField {
        field: field.to_string(),
      }),
      None => Ok(()),
    }
  }
}

/// Admin login guard: throttled credential checks and single-session tokens
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  token_repo: Arc<dyn AccessTokenRepository>,
  rate_limiter: Arc<dyn RateLimiter>,
  password_hasher: Arc<dyn PasswordHasher>,
  token_generator: Arc<dyn TokenGenerator>,
  clock: Arc<dyn Clock>,
  config: AuthServiceConfig,
  decoy_hash: OnceCell<PasswordHash>,
}

impl AuthService {
  /// Creates a new instance of AuthService
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    token_repo: Arc<dyn AccessTokenRepository>,
    rate_limiter: Arc<dyn RateLimiter>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_generator: Arc<dyn TokenGenerator>,
    clock: Arc<dyn Clock>,
    config: AuthServiceConfig,
  ) -> Self {
    Self {
      user_repo,
      token_repo,
      rate_limiter,
      password_hasher,
      token_generator,
      clock,
      config,
      decoy_hash: OnceCell::new(),
    }
  }

  pub fn config(&self) -> &AuthServiceConfig {
    &self.config
  }

  /// Authenticates an admin and issues a fresh access token
  ///
  /// # Arguments
  /// * `identifier` - Login identifier (email)
  /// * `password` - Plain text password
  /// * `origin` - Caller origin, part of the throttle key
  ///
  /// # Returns
  /// A tuple containing (User, AccessToken, PlainTextToken) on success
  ///
  /// # Errors
  /// * `AuthError::RateLimited` when the throttle key has used up its attempts
  /// * `AuthError::InvalidCredentials` for an unknown identifier, a wrong
  ///   password, or an identity that is not an admin
  pub async fn attempt_login(
    &self,
    identifier: LoginIdentifier,
    password: Password,
    origin: Origin,
  ) -> Result<(User, AccessToken, PlainTextToken), AuthError> {
    let key = ThrottleKey::new(&identifier, &origin);

    if self.rate_limiter.attempts(&key).await? >= self.config.max_attempts {
      let available_in = self.rate_limiter.available_in(&key).await?;
      tracing::warn!(
        "Login throttled for {}, available again in {}s",
        key,
        available_in
      );
      return Err(AuthError::RateLimited { available_in });
    }

    let Some(mut user) = self.user_repo.find_by_login(&identifier).await? else {
      self.verify_decoy(&password).await;
      return Err(self.reject_credentials(&key).await);
    };

    let password_hash = match PasswordHash::from_hash(user.password_hash.as_str()) {
      Ok(hash) => hash,
      Err(e) => {
        tracing::error!("Stored password hash for user {} is unusable: {}", user.id, e);
        self.verify_decoy(&password).await;
        return Err(self.reject_credentials(&key).await);
      }
    };

    if !self.password_hasher.verify(&password, &password_hash).await? {
      return Err(self.reject_credentials(&key).await);
    }

    if !user.is_admin() {
      return Err(self.reject_credentials(&key).await);
    }

    self.rate_limiter.clear(&key).await?;

    let now = self.clock.now();
    user.record_login(now, &origin);
    let user = self.user_repo.update(user).await?;

    let plain_token = self.token_generator.generate().await?;
    let token = AccessToken::issue(
      user.id,
      ADMIN_TOKEN_NAME,
      plain_token.hash(),
      vec![TokenAbility::Admin],
      now,
      Duration::minutes(self.config.token_ttl_minutes),
    );

    // Single active session: every earlier token of this user goes away
    let token = self.token_repo.replace_all_for_user(token).await?;

    tracing::info!("Admin {} logged in from {}", user.id, origin);

    Ok((user, token, plain_token))
  }

  /// Spends the same hashing work as a real password check
  async fn verify_decoy(&self, password: &Password) {
    let decoy = self
      .decoy_hash
      .get_or_try_init(|| async {
        let decoy = Password::new(DECOY_PASSWORD)?;
        self.password_hasher.hash(&decoy).await
      })
      .await;

    match decoy {
      Ok(hash) => {
        if let Err(e) = self.password_hasher.verify(password, hash).await {
          tracing::warn!("Decoy password check failed: {}", e);
        }
      }
      Err(e) => tracing::error!("Could not prepare decoy password hash: {}", e),
    }
  }

  /// Counts a failed attempt and builds the one error every rejection shares
  async fn reject_credentials(&self, key: &ThrottleKey) -> AuthError {
    match self.rate_limiter.hit(key, self.config.decay_seconds).await {
      Ok(hits) => {
        tracing::warn!(
          "Rejected login for {} ({}/{} attempts)",
          key,
          hits,
          self.config.max_attempts
        );
        AuthError::InvalidCredentials
      }
      Err(e) => e,
    }
  }

  /// Revokes every access token of a user
  ///
  /// Calling it for a user without tokens is not an error.
  ///
  /// # Returns
  /// The number of tokens deleted
  pub async fn logout(&self, user_id: Uuid) -> Result<u64, AuthError> {
    let revoked = self.token_repo.delete_all_for_user(user_id).await?;

    tracing::info!("Revoked {} access token(s) for user {}", revoked, user_id);

    Ok(revoked)
  }

  /// Attempts left in the current window for an identifier and origin
  pub async fn remaining_attempts(
    &self,
    identifier: &LoginIdentifier,
    origin: &Origin,
  ) -> Result<u32, AuthError> {
    let key = ThrottleKey::new(identifier, origin);
    let attempts = self.rate_limiter.attempts(&key).await?;

    Ok(self.config.max_attempts.saturating_sub(attempts))
  }

  /// Resolves a presented bearer token to its admin
  ///
  /// # Errors
  /// * `AuthError::Unauthenticated` for unknown or expired tokens, or when
  ///   the owner no longer exists
  /// * `AuthError::Forbidden` when the token or its owner lacks admin rights
  pub async fn authenticate(
    &self,
    plain_token: &PlainTextToken,
  ) -> Result<(User, AccessToken), AuthError> {
    let token = self
      .token_repo
      .find_by_token_hash(&plain_token.hash())
      .await?
      .ok_or(AuthError::Unauthenticated)?;

    let now = self.clock.now();
    if token.is_expired_at(now) {
      self.token_repo.delete(token.id).await?;
      return Err(AuthError::Unauthenticated);
    }

    if !token.can(TokenAbility::Admin) {
      return Err(AuthError::Forbidden);
    }

    let user = self
      .user_repo
      .find_by_id(token.user_id)
      .await?
      .ok_or(AuthError::Unauthenticated)?;

    if !user.is_admin() {
      return Err(AuthError::Forbidden);
    }

    self.token_repo.touch(token.id, now).await?;

    Ok((user, token))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{AuthHarness, ADMIN_EMAIL, ADMIN_PASSWORD};

  #[test]
  fn test_config_validation() {
    assert!(AuthServiceConfig::default().validate().is_ok());

    let config = AuthServiceConfig {
      max_attempts: 0,
      ..AuthServiceConfig::default()
    };
    assert!(matches!(
      config.validate(),
      Err(ValidationError::InvalidField { field }) if field == "max_attempts"
    ));

    let config = AuthServiceConfig {
      token_ttl_minutes: 0,
      ..AuthServiceConfig::default()
    };
    assert!(config.validate().is_err());
  }

  fn identifier(value: &str) -> LoginIdentifier {
    LoginIdentifier::new(value).unwrap()
  }

  fn password(value: &str) -> Password {
    Password::new(value).unwrap()
  }

  fn origin(value: &str) -> Origin {
    Origin::new(value).unwrap()
  }

  async fn fail_login(harness: &AuthHarness, email: &str, from: &str) -> AuthError {
    harness
      .service
      .attempt_login(identifier(email), password("wrong-password"), origin(from))
      .await
      .unwrap_err()
  }

  #[tokio::test]
  async fn test_successful_login_issues_admin_token() {
    let harness = AuthHarness::new().await;
    let admin = harness.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;

    let (user, token, plain) = harness
      .service
      .attempt_login(
        identifier(ADMIN_EMAIL),
        password(ADMIN_PASSWORD),
        origin("1.2.3.4"),
      )
      .await
      .unwrap();

    assert_eq!(user.id, admin.id);
    assert!(!plain.as_str().is_empty());
    assert_eq!(token.token_hash, plain.hash());
    assert!(token.can(TokenAbility::Admin));
    assert_eq!(token.created_at, harness.clock.now());
    assert_eq!(token.expires_at - token.created_at, Duration::minutes(60));
  }

  #[tokio::test]
  async fn test_successful_login_records_last_login() {
    let harness = AuthHarness::new().await;
    let admin = harness.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;

    harness
      .service
      .attempt_login(
        identifier(ADMIN_EMAIL),
        password(ADMIN_PASSWORD),
        origin("1.2.3.4"),
      )
      .await
      .unwrap();

    let stored = harness.users.get(admin.id).unwrap();
    assert_eq!(stored.last_login_at, Some(harness.clock.now()));
    assert_eq!(stored.last_login_ip.as_deref(), Some("1.2.3.4"));
  }

  #[tokio::test]
  async fn test_remaining_attempts_after_failures() {
    let harness = AuthHarness::new().await;
    harness.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;

    assert_eq!(
      harness
        .service
        .remaining_attempts(&identifier(ADMIN_EMAIL), &origin("1.2.3.4"))
        .await
        .unwrap(),
      5
    );

    for failures in 1..5 {
      fail_login(&harness, ADMIN_EMAIL, "1.2.3.4").await;

      let remaining = harness
        .service
        .remaining_attempts(&identifier(ADMIN_EMAIL), &origin("1.2.3.4"))
        .await
        .unwrap();
      assert_eq!(remaining, 5 - failures);
    }
  }

  #[tokio::test]
  async fn test_sixth_attempt_is_rate_limited_even_with_correct_password() {
    let harness = AuthHarness::new().await;
    harness.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;

    for _ in 0..5 {
      let error = fail_login(&harness, ADMIN_EMAIL, "1.2.3.4").await;
      assert!(matches!(error, AuthError::InvalidCredentials));
    }

    let error = harness
      .service
      .attempt_login(
        identifier(ADMIN_EMAIL),
        password(ADMIN_PASSWORD),
        origin("1.2.3.4"),
      )
      .await
      .unwrap_err();

    match error {
      AuthError::RateLimited { available_in } => assert!(available_in > 0),
      other => panic!("expected RateLimited, got {:?}", other),
    }

    let key = ThrottleKey::new(&identifier(ADMIN_EMAIL), &origin("1.2.3.4"));
    assert_eq!(harness.limiter.attempts(&key).await.unwrap(), 5);
    assert!(harness.tokens.is_empty());
  }

  #[tokio::test]
  async fn test_successful_login_clears_throttle_counter() {
    let harness = AuthHarness::new().await;
    harness.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;

    for _ in 0..3 {
      fail_login(&harness, ADMIN_EMAIL, "1.2.3.4").await;
    }

    harness
      .service
      .attempt_login(
        identifier(ADMIN_EMAIL),
        password(ADMIN_PASSWORD),
        origin("1.2.3.4"),
      )
      .await
      .unwrap();

    fail_login(&harness, ADMIN_EMAIL, "1.2.3.4").await;

    let remaining = harness
      .service
      .remaining_attempts(&identifier(ADMIN_EMAIL), &origin("1.2.3.4"))
      .await
      .unwrap();
    assert_eq!(remaining, 4);
  }

  #[tokio::test]
  async fn test_window_decays_after_interval() {
    let harness = AuthHarness::new().await;
    harness.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;

    for _ in 0..5 {
      fail_login(&harness, ADMIN_EMAIL, "1.2.3.4").await;
    }

    harness.clock.advance(Duration::seconds(3600));

    let remaining = harness
      .service
      .remaining_attempts(&identifier(ADMIN_EMAIL), &origin("1.2.3.4"))
      .await
      .unwrap();
    assert_eq!(remaining, 5);

    let result = harness
      .service
      .attempt_login(
        identifier(ADMIN_EMAIL),
        password(ADMIN_PASSWORD),
        origin("1.2.3.4"),
      )
      .await;
    assert!(result.is_ok());
  }

  #[tokio::test]
  async fn test_throttle_is_scoped_to_origin_and_case_insensitive() {
    let harness = AuthHarness::new().await;
    harness.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;

    for _ in 0..5 {
      fail_login(&harness, "ADMIN@Test.com", "1.2.3.4").await;
    }

    let same_key = fail_login(&harness, ADMIN_EMAIL, "1.2.3.4").await;
    assert!(matches!(same_key, AuthError::RateLimited { .. }));

    let other_origin = harness
      .service
      .attempt_login(
        identifier(ADMIN_EMAIL),
        password(ADMIN_PASSWORD),
        origin("5.6.7.8"),
      )
      .await;
    assert!(other_origin.is_ok());
  }

  #[tokio::test]
  async fn test_rejections_are_indistinguishable() {
    let harness = AuthHarness::new().await;
    harness.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;
    harness
      .seed_user("editor@test.com", ADMIN_PASSWORD, false)
      .await;

    let unknown = harness
      .service
      .attempt_login(
        identifier("nobody@test.com"),
        password(ADMIN_PASSWORD),
        origin("1.2.3.4"),
      )
      .await
      .unwrap_err();
    let wrong_secret = fail_login(&harness, ADMIN_EMAIL, "1.2.3.4").await;
    let not_admin = harness
      .service
      .attempt_login(
        identifier("editor@test.com"),
        password(ADMIN_PASSWORD),
        origin("1.2.3.4"),
      )
      .await
      .unwrap_err();

    assert!(matches!(unknown, AuthError::InvalidCredentials));
    assert!(matches!(wrong_secret, AuthError::InvalidCredentials));
    assert!(matches!(not_admin, AuthError::InvalidCredentials));
    assert_eq!(unknown.to_string(), wrong_secret.to_string());
    assert_eq!(wrong_secret.to_string(), not_admin.to_string());
  }

  #[tokio::test]
  async fn test_unusable_stored_hash_is_rejected_like_a_wrong_password() {
    let harness = AuthHarness::new().await;
    let broken = User::new(
      "Broken".to_string(),
      "broken@test.com".to_string(),
      "not-a-phc-string".to_string(),
      true,
    );
    harness.users.create(broken).await.unwrap();

    let result = harness
      .service
      .attempt_login(
        identifier("broken@test.com"),
        password(ADMIN_PASSWORD),
        origin("1.2.3.4"),
      )
      .await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    let remaining = harness
      .service
      .remaining_attempts(&identifier("broken@test.com"), &origin("1.2.3.4"))
      .await
      .unwrap();
    assert_eq!(remaining, 4);
  }

  #[tokio::test]
  async fn test_unknown_identifier_still_runs_password_check() {
    let harness = AuthHarness::new().await;

    for _ in 0..2 {
      let result = harness
        .service
        .attempt_login(
          identifier("nobody@test.com"),
          password(DECOY_PASSWORD),
          origin("1.2.3.4"),
        )
        .await;
      assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    assert!(harness.service.decoy_hash.initialized());
  }

  #[tokio::test]
  async fn test_non_admin_rejection_consumes_attempts() {
    let harness = AuthHarness::new().await;
    harness
      .seed_user("editor@test.com", ADMIN_PASSWORD, false)
      .await;

    harness
      .service
      .attempt_login(
        identifier("editor@test.com"),
        password(ADMIN_PASSWORD),
        origin("1.2.3.4"),
      )
      .await
      .unwrap_err();

    let remaining = harness
      .service
      .remaining_attempts(&identifier("editor@test.com"), &origin("1.2.3.4"))
      .await
      .unwrap();
    assert_eq!(remaining, 4);
    assert!(harness.tokens.is_empty());
  }

  #[tokio::test]
  async fn test_relogin_invalidates_previous_token() {
    let harness = AuthHarness::new().await;
    let admin = harness.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;

    let (_, _, first) = harness
      .service
      .attempt_login(
        identifier(ADMIN_EMAIL),
        password(ADMIN_PASSWORD),
        origin("1.2.3.4"),
      )
      .await
      .unwrap();
    assert!(harness.service.authenticate(&first).await.is_ok());

    let (_, _, second) = harness
      .service
      .attempt_login(
        identifier(ADMIN_EMAIL),
        password(ADMIN_PASSWORD),
        origin("1.2.3.4"),
      )
      .await
      .unwrap();

    assert!(matches!(
      harness.service.authenticate(&first).await,
      Err(AuthError::Unauthenticated)
    ));
    assert!(harness.service.authenticate(&second).await.is_ok());
    assert_eq!(harness.tokens.find_by_user_id(admin.id).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_logout_is_idempotent() {
    let harness = AuthHarness::new().await;
    let admin = harness.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;

    harness
      .service
      .attempt_login(
        identifier(ADMIN_EMAIL),
        password(ADMIN_PASSWORD),
        origin("1.2.3.4"),
      )
      .await
      .unwrap();

    assert_eq!(harness.service.logout(admin.id).await.unwrap(), 1);
    assert_eq!(harness.service.logout(admin.id).await.unwrap(), 0);
    assert!(harness.tokens.find_by_user_id(admin.id).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_expired_token_is_rejected_and_removed() {
    let harness = AuthHarness::new().await;
    let admin = harness.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;

    let (_, _, plain) = harness
      .service
      .attempt_login(
        identifier(ADMIN_EMAIL),
        password(ADMIN_PASSWORD),
        origin("1.2.3.4"),
      )
      .await
      .unwrap();

    harness.clock.advance(Duration::minutes(60));

    assert!(matches!(
      harness.service.authenticate(&plain).await,
      Err(AuthError::Unauthenticated)
    ));
    assert!(harness.tokens.find_by_user_id(admin.id).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_authenticate_touches_token() {
    let harness = AuthHarness::new().await;
    harness.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;

    let (_, token, plain) = harness
      .service
      .attempt_login(
        identifier(ADMIN_EMAIL),
        password(ADMIN_PASSWORD),
        origin("1.2.3.4"),
      )
      .await
      .unwrap();
    assert!(token.last_used_at.is_none());

    harness.clock.advance(Duration::minutes(5));
    let (_, _) = harness.service.authenticate(&plain).await.unwrap();

    let stored = harness
      .tokens
      .find_by_token_hash(&plain.hash())
      .await
      .unwrap()
      .unwrap();
    assert_eq!(stored.last_used_at, Some(harness.clock.now()));
  }

  #[tokio::test]
  async fn test_demoted_admin_token_is_forbidden() {
    let harness = AuthHarness::new().await;
    let admin = harness.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;

    let (_, _, plain) = harness
      .service
      .attempt_login(
        identifier(ADMIN_EMAIL),
        password(ADMIN_PASSWORD),
        origin("1.2.3.4"),
      )
      .await
      .unwrap();

    let mut demoted = harness.users.get(admin.id).unwrap();
    demoted.is_admin = false;
    harness.users.update(demoted).await.unwrap();

    assert!(matches!(
      harness.service.authenticate(&plain).await,
      Err(AuthError::Forbidden)
    ));
  }
}
