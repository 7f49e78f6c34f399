//! Favorite markers.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use cardvault_core::error::AppError;
use cardvault_core::result::AppResult;
use cardvault_core::types::{FavoriteId, ResourceRef, UserId};
use cardvault_entity::favorite::Favorite;

use crate::error::map_db_error;

/// Storage of soft-deletable favorite markers, unique per (user, resource).
#[async_trait]
pub trait FavoriteRepository: Send + Sync + Debug + 'static {
    /// Find the marker for (user, resource), including a soft-deleted one.
    async fn find(&self, user: UserId, resource: ResourceRef) -> AppResult<Option<Favorite>>;

    /// Insert an active marker. A second marker for the pair is a `Conflict`.
    async fn create(&self, user: UserId, resource: ResourceRef) -> AppResult<Favorite>;

    /// Clear `deleted_at`, keeping the original ID and `created_at`.
    async fn restore(&self, id: FavoriteId) -> AppResult<Favorite>;

    /// Set `deleted_at`.
    async fn soft_delete(&self, id: FavoriteId) -> AppResult<Favorite>;
}

/// PostgreSQL favorite repository.
#[derive(Debug, Clone)]
pub struct PgFavoriteRepository {
    pool: PgPool,
}

impl PgFavoriteRepository {
    /// Create a new favorite repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteRepository for PgFavoriteRepository {
    async fn find(&self, user: UserId, resource: ResourceRef) -> AppResult<Option<Favorite>> {
        sqlx::query_as::<_, Favorite>(
            "SELECT * FROM favorites \
             WHERE user_id = $1 AND resource_kind = $2 AND resource_id = $3",
        )
        .bind(user)
        .bind(resource.kind())
        .bind(resource.uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Failed to find favorite"))
    }

    async fn create(&self, user: UserId, resource: ResourceRef) -> AppResult<Favorite> {
        sqlx::query_as::<_, Favorite>(
            "INSERT INTO favorites (id, user_id, resource_kind, resource_id, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(FavoriteId::new())
        .bind(user)
        .bind(resource.kind())
        .bind(resource.uuid())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error("Failed to create favorite"))
    }

    async fn restore(&self, id: FavoriteId) -> AppResult<Favorite> {
        sqlx::query_as::<_, Favorite>(
            "UPDATE favorites SET deleted_at = NULL WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Failed to restore favorite"))?
        .ok_or_else(|| AppError::not_found(format!("Favorite {id} not found")))
    }

    async fn soft_delete(&self, id: FavoriteId) -> AppResult<Favorite> {
        sqlx::query_as::<_, Favorite>(
            "UPDATE favorites SET deleted_at = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Failed to remove favorite"))?
        .ok_or_else(|| AppError::not_found(format!("Favorite {id} not found")))
    }
}
