use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;

use cardvault_core::error::AppError;
use cardvault_core::result::AppResult;
use cardvault_core::types::{FavoriteId, ResourceRef, UserId};
use cardvault_entity::favorite::Favorite;

use super::MemoryStore;
use crate::repositories::FavoriteRepository;

impl MemoryStore {
    fn favorite_key(&self, id: FavoriteId) -> Option<(UserId, ResourceRef)> {
        self.state
            .favorites
            .iter()
            .find(|f| f.id == id)
            .map(|f| *f.key())
    }

    fn set_favorite_deleted_at(
        &self,
        id: FavoriteId,
        deleted_at: Option<chrono::DateTime<Utc>>,
    ) -> AppResult<Favorite> {
        let key = self
            .favorite_key(id)
            .ok_or_else(|| AppError::not_found(format!("Favorite {id} not found")))?;
        let mut fav = self
            .state
            .favorites
            .get_mut(&key)
            .ok_or_else(|| AppError::not_found(format!("Favorite {id} not found")))?;
        fav.deleted_at = deleted_at;
        Ok(fav.clone())
    }
}

#[async_trait]
impl FavoriteRepository for MemoryStore {
    async fn find(&self, user: UserId, resource: ResourceRef) -> AppResult<Option<Favorite>> {
        Ok(self.state.favorites.get(&(user, resource)).map(|f| f.clone()))
    }

    async fn create(&self, user: UserId, resource: ResourceRef) -> AppResult<Favorite> {
        match self.state.favorites.entry((user, resource)) {
            Entry::Occupied(_) => Err(AppError::conflict("Favorite already exists")),
            Entry::Vacant(slot) => {
                let fav = Favorite {
                    id: FavoriteId::new(),
                    user_id: user,
                    resource_kind: resource.kind(),
                    resource_id: resource.uuid(),
                    created_at: Utc::now(),
                    deleted_at: None,
                };
                slot.insert(fav.clone());
                Ok(fav)
            }
        }
    }

    async fn restore(&self, id: FavoriteId) -> AppResult<Favorite> {
        self.set_favorite_deleted_at(id, None)
    }

    async fn soft_delete(&self, id: FavoriteId) -> AppResult<Favorite> {
        self.set_favorite_deleted_at(id, Some(Utc::now()))
    }
}
