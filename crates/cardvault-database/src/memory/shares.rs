use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;

use cardvault_core::error::AppError;
use cardvault_core::result::AppResult;
use cardvault_core::types::{ResourceKind, ResourceRef, ShareId, UserId};
use cardvault_entity::share::{NewShare, Share, ShareCapabilities};

use super::{MemoryStore, Sequenced};
use crate::repositories::{ResourceRepository, ShareRepository};

impl MemoryStore {
    /// Shares matching `filter`, oldest first.
    fn collect_shares(&self, filter: impl Fn(&Share) -> bool) -> Vec<Share> {
        let mut rows: Vec<Sequenced<Share>> = self
            .state
            .shares
            .iter()
            .filter(|s| filter(&s.row))
            .map(|s| s.value().clone())
            .collect();
        rows.sort_by_key(|s| (s.row.created_at, s.seq));
        rows.into_iter().map(|s| s.row).collect()
    }
}

#[async_trait]
impl ShareRepository for MemoryStore {
    async fn find_by_id(&self, id: ShareId) -> AppResult<Option<Share>> {
        Ok(self.state.shares.get(&id).map(|s| s.row.clone()))
    }

    async fn find_for_user(
        &self,
        resource: ResourceRef,
        user: UserId,
    ) -> AppResult<Option<Share>> {
        let Some(id) = self
            .state
            .share_index
            .get(&(resource, user))
            .map(|id| *id)
        else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn list_for_resource(&self, resource: ResourceRef) -> AppResult<Vec<Share>> {
        Ok(self.collect_shares(|s| s.resource == resource))
    }

    async fn list_shared_with(
        &self,
        user: UserId,
        kind: Option<ResourceKind>,
    ) -> AppResult<Vec<Share>> {
        Ok(self.collect_shares(|s| {
            s.shared_with == user && kind.is_none_or(|k| s.resource.kind() == k)
        }))
    }

    async fn create(&self, data: &NewShare) -> AppResult<Share> {
        let kind = data.resource.kind();
        if data.capabilities.kind() != kind {
            return Err(AppError::validation(format!(
                "Capabilities for {} do not apply to a {kind}",
                data.capabilities.kind()
            )));
        }
        if self.find_header(data.resource).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Resource {} not found",
                data.resource
            )));
        }
        if !self.state.users.contains_key(&data.shared_with) {
            return Err(AppError::user_not_found(format!(
                "User {} not found",
                data.shared_with
            )));
        }

        match self.state.share_index.entry((data.resource, data.shared_with)) {
            Entry::Occupied(_) => Err(AppError::conflict("Share already exists for this user")),
            Entry::Vacant(slot) => {
                let share = Share {
                    id: ShareId::new(),
                    resource: data.resource,
                    shared_with: data.shared_with,
                    capabilities: data.capabilities,
                    created_at: Utc::now(),
                };
                slot.insert(share.id);
                self.state.shares.insert(
                    share.id,
                    Sequenced {
                        seq: self.next_seq(),
                        row: share.clone(),
                    },
                );
                Ok(share)
            }
        }
    }

    async fn update_capabilities(
        &self,
        id: ShareId,
        capabilities: ShareCapabilities,
    ) -> AppResult<Option<Share>> {
        if capabilities == ShareCapabilities::Voucher {
            return Err(AppError::validation("Voucher shares have no capabilities"));
        }
        let Some(mut stored) = self.state.shares.get_mut(&id) else {
            return Ok(None);
        };
        if stored.row.resource.kind() != capabilities.kind() {
            // No share of that kind has this id.
            return Ok(None);
        }
        stored.row.capabilities = capabilities;
        Ok(Some(stored.row.clone()))
    }

    async fn delete(&self, id: ShareId) -> AppResult<bool> {
        match self.state.shares.remove(&id) {
            Some((_, stored)) => {
                self.state
                    .share_index
                    .remove(&(stored.row.resource, stored.row.shared_with));
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
