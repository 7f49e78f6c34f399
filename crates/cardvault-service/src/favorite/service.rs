//! Favorite toggle service.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use cardvault_auth::AccessResolver;
use cardvault_core::result::AppResult;
use cardvault_core::types::{ResourceKind, ResourceRef};
use cardvault_database::repositories::FavoriteRepository;
use cardvault_entity::favorite::FavoriteState;

use crate::context::RequestContext;

/// Toggles a user's favorite marker on resources they can view.
#[derive(Debug, Clone)]
pub struct FavoriteService {
    /// Favorite storage.
    favorite_repo: Arc<dyn FavoriteRepository>,
    /// Permission checks.
    access: AccessResolver,
}

impl FavoriteService {
    /// Creates a new favorite service.
    pub fn new(favorite_repo: Arc<dyn FavoriteRepository>, access: AccessResolver) -> Self {
        Self {
            favorite_repo,
            access,
        }
    }

    /// Flip the caller's favorite marker on a resource and return whether
    /// it is now favorited.
    ///
    /// `Absent` creates a marker, `SoftDeleted` restores it with its
    /// original ID and creation time, `Active` soft-deletes it.
    pub async fn toggle_favorite(
        &self,
        ctx: &RequestContext,
        kind: ResourceKind,
        resource_id: Uuid,
    ) -> AppResult<bool> {
        let resource = ResourceRef::from_parts(kind, resource_id);
        ctx.run(async {
            self.access.check_access(ctx.user_id, resource).await?;

            let existing = self.favorite_repo.find(ctx.user_id, resource).await?;
            let favorited = match FavoriteState::from_row(existing) {
                FavoriteState::Absent => {
                    self.favorite_repo.create(ctx.user_id, resource).await?;
                    true
                }
                FavoriteState::SoftDeleted(fav) => {
                    self.favorite_repo.restore(fav.id).await?;
                    true
                }
                FavoriteState::Active(fav) => {
                    self.favorite_repo.soft_delete(fav.id).await?;
                    false
                }
            };

            info!(
                user_id = %ctx.user_id,
                resource = %resource,
                favorited,
                "Favorite toggled"
            );
            Ok(favorited)
        })
        .await
    }

    /// Whether the caller has favorited a resource.
    pub async fn is_favorite(
        &self,
        ctx: &RequestContext,
        kind: ResourceKind,
        resource_id: Uuid,
    ) -> AppResult<bool> {
        let resource = ResourceRef::from_parts(kind, resource_id);
        ctx.run(async {
            self.access.check_access(ctx.user_id, resource).await?;
            let row = self.favorite_repo.find(ctx.user_id, resource).await?;
            let state = FavoriteState::from_row(row);
            debug!(
                user_id = %ctx.user_id,
                resource = %resource,
                active = state.is_active(),
                "Favorite state"
            );
            Ok(state.is_active())
        })
        .await
    }
}
