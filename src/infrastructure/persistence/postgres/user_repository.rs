use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::{
  entities::User,
  errors::{AuthError, RepositoryError},
  ports::UserRepository,
  value_objects::LoginIdentifier,
};

/// PostgreSQL implementation of the UserRepository trait
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  /// Creates a new instance of PostgresUserRepository
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: Uuid,
  name: String,
  email: String,
  password_hash: String,
  is_admin: bool,
  last_login_at: Option<DateTime<Utc>>,
  last_login_ip: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User::from_db(
      row.id,
      row.name,
      row.email,
      row.password_hash,
      row.is_admin,
      row.last_login_at,
      row.last_login_ip,
      row.created_at,
      row.updated_at,
    )
  }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            INSERT INTO users (
                id,
                name,
                email,
                password_hash,
                is_admin,
                last_login_at,
                last_login_ip,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING
                id,
                name,
                email,
                password_hash,
                is_admin,
                last_login_at,
                last_login_ip,
                created_at,
                updated_at
            "#,
    )
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.is_admin)
    .bind(user.last_login_at)
    .bind(&user.last_login_ip)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(&self.pool)
    .await?;

    Ok(result.into())
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT
                id,
                name,
                email,
                password_hash,
                is_admin,
                last_login_at,
                last_login_ip,
                created_at,
                updated_at
            FROM users
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(result.map(Into::into))
  }

  async fn find_by_login(&self, identifier: &LoginIdentifier) -> Result<Option<User>, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT
                id,
                name,
                email,
                password_hash,
                is_admin,
                last_login_at,
                last_login_ip,
                created_at,
                updated_at
            FROM users
            WHERE LOWER(email) = $1
            "#,
    )
    .bind(identifier.normalized())
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to look up user by login: {}", e);
      AuthError::from(e)
    })?;

    Ok(result.map(Into::into))
  }

  async fn update(&self, user: User) -> Result<User, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            UPDATE users
            SET
                name = $2,
                email = $3,
                password_hash = $4,
                is_admin = $5,
                last_login_at = $6,
                last_login_ip = $7,
                updated_at = $8
            WHERE id = $1
            RETURNING
                id,
                name,
                email,
                password_hash,
                is_admin,
                last_login_at,
                last_login_ip,
                created_at,
                updated_at
            "#,
    )
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.is_admin)
    .bind(user.last_login_at)
    .bind(&user.last_login_ip)
    .bind(user.updated_at)
    .fetch_one(&self.pool)
    .await;

    match result {
      Ok(row) => Ok(row.into()),
      Err(sqlx::Error::RowNotFound) => Err(AuthError::Repository(RepositoryError::NotFound)),
      Err(e) => Err(e.into()),
    }
  }
}
