use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::{
  entities::AccessToken,
  errors::{AuthError, RepositoryError},
  ports::AccessTokenRepository,
  value_objects::{TokenAbility, TokenHash},
};

/// PostgreSQL implementation of the AccessTokenRepository trait
pub struct PostgresAccessTokenRepository {
  pool: PgPool,
}

impl PostgresAccessTokenRepository {
  /// Creates a new instance of PostgresAccessTokenRepository
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for personal_access_tokens table
#[derive(Debug, sqlx::FromRow)]
struct AccessTokenRow {
  id: Uuid,
  user_id: Uuid,
  name: String,
  token_hash: String,
  abilities: Vec<String>,
  last_used_at: Option<DateTime<Utc>>,
  expires_at: DateTime<Utc>,
  created_at: DateTime<Utc>,
}

impl TryFrom<AccessTokenRow> for AccessToken {
  type Error = AuthError;

  fn try_from(row: AccessTokenRow) -> Result<Self, Self::Error> {
    let abilities = row
      .abilities
      .iter()
      .map(|ability| ability.parse::<TokenAbility>())
      .collect::<Result<Vec<_>, _>>()?;

    Ok(AccessToken::from_db(
      row.id,
      row.user_id,
      row.name,
      TokenHash::from_hash(row.token_hash)?,
      abilities,
      row.last_used_at,
      row.expires_at,
      row.created_at,
    ))
  }
}

fn ability_names(token: &AccessToken) -> Vec<String> {
  token
    .abilities
    .iter()
    .map(|ability| ability.as_str().to_string())
    .collect()
}

const INSERT_TOKEN: &str = r#"
            INSERT INTO personal_access_tokens (
                id,
                user_id,
                name,
                token_hash,
                abilities,
                last_used_at,
                expires_at,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING
                id,
                user_id,
                name,
                token_hash,
                abilities,
                last_used_at,
                expires_at,
                created_at
            "#;

#[async_trait]
impl AccessTokenRepository for PostgresAccessTokenRepository {
  async fn create(&self, token: AccessToken) -> Result<AccessToken, AuthError> {
    let row = sqlx::query_as::<_, AccessTokenRow>(INSERT_TOKEN)
      .bind(token.id)
      .bind(token.user_id)
      .bind(&token.name)
      .bind(token.token_hash.as_str())
      .bind(ability_names(&token))
      .bind(token.last_used_at)
      .bind(token.expires_at)
      .bind(token.created_at)
      .fetch_one(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to create access token: {}", e);
        AuthError::from(e)
      })?;

    row.try_into()
  }

  async fn find_by_token_hash(
    &self,
    token_hash: &TokenHash,
  ) -> Result<Option<AccessToken>, AuthError> {
    let row = sqlx::query_as::<_, AccessTokenRow>(
      r#"
            SELECT
                id,
                user_id,
                name,
                token_hash,
                abilities,
                last_used_at,
                expires_at,
                created_at
            FROM personal_access_tokens
            WHERE token_hash = $1
            "#,
    )
    .bind(token_hash.as_str())
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find access token by hash: {}", e);
      AuthError::from(e)
    })?;

    row.map(TryInto::try_into).transpose()
  }

  async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<AccessToken>, AuthError> {
    let rows = sqlx::query_as::<_, AccessTokenRow>(
      r#"
            SELECT
                id,
                user_id,
                name,
                token_hash,
                abilities,
                last_used_at,
                expires_at,
                created_at
            FROM personal_access_tokens
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find access tokens by user_id: {}", e);
      AuthError::from(e)
    })?;

    rows.into_iter().map(TryInto::try_into).collect()
  }

  async fn touch(&self, token_id: Uuid, at: DateTime<Utc>) -> Result<(), AuthError> {
    let result = sqlx::query(
      r#"
            UPDATE personal_access_tokens
            SET last_used_at = $2
            WHERE id = $1
            "#,
    )
    .bind(token_id)
    .bind(at)
    .execute(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to touch access token: {}", e);
      AuthError::from(e)
    })?;

    if result.rows_affected() == 0 {
      return Err(AuthError::Repository(RepositoryError::NotFound));
    }

    Ok(())
  }

  async fn delete(&self, token_id: Uuid) -> Result<(), AuthError> {
    sqlx::query(
      r#"
            DELETE FROM personal_access_tokens
            WHERE id = $1
            "#,
    )
    .bind(token_id)
    .execute(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to delete access token: {}", e);
      AuthError::from(e)
    })?;

    Ok(())
  }

  async fn delete_all_for_user(&self, user_id: Uuid) -> Result<u64, AuthError> {
    let result = sqlx::query(
      r#"
            DELETE FROM personal_access_tokens
            WHERE user_id = $1
            "#,
    )
    .bind(user_id)
    .execute(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to delete access tokens for user: {}", e);
      AuthError::from(e)
    })?;

    Ok(result.rows_affected())
  }

  async fn replace_all_for_user(&self, token: AccessToken) -> Result<AccessToken, AuthError> {
    let mut tx = self.pool.begin().await.map_err(|e| {
      AuthError::Repository(RepositoryError::TransactionFailed(e.to_string()))
    })?;

    let revoked = sqlx::query(
      r#"
            DELETE FROM personal_access_tokens
            WHERE user_id = $1
            "#,
    )
    .bind(token.user_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let row = sqlx::query_as::<_, AccessTokenRow>(INSERT_TOKEN)
      .bind(token.id)
      .bind(token.user_id)
      .bind(&token.name)
      .bind(token.token_hash.as_str())
      .bind(ability_names(&token))
      .bind(token.last_used_at)
      .bind(token.expires_at)
      .bind(token.created_at)
      .fetch_one(&mut *tx)
      .await?;

    tx.commit().await.map_err(|e| {
      tracing::error!("Failed to commit token rotation: {}", e);
      AuthError::Repository(RepositoryError::TransactionFailed(e.to_string()))
    })?;

    tracing::debug!(
      "Rotated access tokens for user {} ({} revoked)",
      token.user_id,
      revoked
    );

    row.try_into()
  }
}
