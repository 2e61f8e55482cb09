//! Database repository for user credential records.
//!
//! The rest of the application only sees the [`UserStore`] capability; the
//! SQLite-backed [`UserRepository`] is injected at startup.

use crate::database::models::{CreateUser, User};
use crate::errors::{ServiceError, ServiceResult};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

/// Create and lookup operations over credential records.
///
/// Email uniqueness is enforced by the store itself: a duplicate insert yields
/// `ServiceError::AlreadyExists`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: CreateUser) -> ServiceResult<User>;

    async fn get_user_by_email(&self, email: &str) -> ServiceResult<Option<User>>;

    async fn get_user_by_id(&self, id: &str) -> ServiceResult<Option<User>>;
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
    /// Shared SQLite connection pool
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// * `pool` - SQLite connection pool (cheap to clone)
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    /// Creates a new user in the database.
    ///
    /// # Arguments
    /// * `user` - CreateUser DTO containing the already hashed password
    ///
    /// # Returns
    /// The newly created User with all fields populated
    async fn create_user(&self, user: CreateUser) -> ServiceResult<User> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(created) => Ok(created),
            Err(sqlx::Error::Database(db_error)) if db_error.is_unique_violation() => {
                Err(ServiceError::already_exists("User", &user.email))
            }
            Err(e) => Err(anyhow::Error::from(e).into()),
        }
    }

    /// Retrieves a user by email.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    async fn get_user_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        Ok(user)
    }

    /// Retrieves a user by their unique identifier.
    async fn get_user_by_id(&self, id: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        Ok(user)
    }
}
