//! User directory.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use cardvault_core::result::AppResult;
use cardvault_core::types::UserId;
use cardvault_entity::user::model::{CreateUser, User, normalize_email};

use crate::error::map_db_error;

/// Lookup and registration of users.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug + 'static {
    /// Find a user by ID.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user by email, case-insensitively.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Register a user. A taken email is a `Conflict`.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;
}

/// PostgreSQL user repository.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error("Failed to find user"))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = $1")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error("Failed to find user by email"))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, display_name, created_at) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(UserId::new())
        .bind(data.email.trim())
        .bind(&data.display_name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error("Failed to create user"))
    }
}
