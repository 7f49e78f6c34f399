//! Access resolver: loads ownership and share facts for (user, resource)
//! and runs them through the permission model.
//!
//! Resolution order:
//! 1. Load the resource. Missing means `NotFound`.
//! 2. Owner check. Unowned resources have no owner.
//! 3. Share lookup, only for non-owners. No share is not an error.
//! 4. Resolve. No view access means `AccessDenied`.
//!
//! Nothing is cached; every check re-reads storage.
//!
//! The resolver takes no request context. Callers that need cancellation
//! wrap each check in `RequestContext::run` from `cardvault-service`, as the
//! services do; dropping the future abandons the storage reads.

use std::sync::Arc;

use tracing::debug;

use cardvault_core::error::AppError;
use cardvault_core::result::AppResult;
use cardvault_core::types::{CardId, GiftCardId, ResourceRef, UserId, VoucherId};
use cardvault_database::repositories::{ResourceRepository, ShareRepository};

use super::permissions::{Permissions, resolve};

/// Resolves a user's permissions on a resource.
#[derive(Debug, Clone)]
pub struct AccessResolver {
    /// Resource ownership lookup.
    resources: Arc<dyn ResourceRepository>,
    /// Share lookup.
    shares: Arc<dyn ShareRepository>,
}

impl AccessResolver {
    /// Creates a new access resolver.
    pub fn new(
        resources: Arc<dyn ResourceRepository>,
        shares: Arc<dyn ShareRepository>,
    ) -> Self {
        Self { resources, shares }
    }

    /// Permissions of `user` on a loyalty card.
    pub async fn check_card_access(&self, user: UserId, card: CardId) -> AppResult<Permissions> {
        self.check_access(user, card.into()).await
    }

    /// Permissions of `user` on a voucher.
    pub async fn check_voucher_access(
        &self,
        user: UserId,
        voucher: VoucherId,
    ) -> AppResult<Permissions> {
        self.check_access(user, voucher.into()).await
    }

    /// Permissions of `user` on a gift card.
    pub async fn check_gift_card_access(
        &self,
        user: UserId,
        gift_card: GiftCardId,
    ) -> AppResult<Permissions> {
        self.check_access(user, gift_card.into()).await
    }

    /// Permissions of `user` on any resource.
    ///
    /// Fails with `NotFound` if the resource does not exist and with
    /// `AccessDenied` if the user may not view it. Not cancellable on its
    /// own; run it inside the caller's request context.
    pub async fn check_access(
        &self,
        user: UserId,
        resource: ResourceRef,
    ) -> AppResult<Permissions> {
        let header = self
            .resources
            .find_header(resource)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Resource {resource} not found")))?;

        let is_owner = header.is_owned_by(user);
        let share = if is_owner {
            None
        } else {
            self.shares.find_for_user(resource, user).await?
        };

        let permissions = resolve(
            resource.kind(),
            is_owner,
            share.as_ref().map(|s| &s.capabilities),
        );

        debug!(
            user_id = %user,
            resource = %resource,
            is_owner,
            shared = share.is_some(),
            can_view = permissions.can_view,
            "Resolved resource access"
        );

        if !permissions.can_view {
            return Err(AppError::access_denied(format!(
                "User {user} has no access to {resource}"
            )));
        }
        Ok(permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardvault_core::error::ErrorKind;
    use cardvault_database::MemoryStore;
    use cardvault_database::repositories::UserRepository;
    use cardvault_entity::resource::{NewCard, NewGiftCard, NewVoucher};
    use cardvault_entity::share::{NewShare, ShareCapabilities};
    use cardvault_entity::user::CreateUser;
    use rust_decimal::Decimal;

    async fn user(store: &MemoryStore, email: &str) -> UserId {
        UserRepository::create(
            store,
            &CreateUser {
                email: email.into(),
                display_name: None,
            },
        )
        .await
        .expect("create user")
        .id
    }

    fn resolver(store: &MemoryStore) -> AccessResolver {
        AccessResolver::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn test_owner_has_full_access() {
        let store = MemoryStore::new();
        let owner = user(&store, "owner@example.com").await;
        let card = store
            .create_card(&NewCard {
                owner_id: Some(owner),
                name: "Bakery".into(),
                card_number: Some("123".into()),
            })
            .await
            .expect("create card");

        let p = resolver(&store)
            .check_card_access(owner, card.id)
            .await
            .expect("owner access");
        assert!(p.is_owner && p.can_edit && p.can_delete);
        assert!(!p.can_edit_transactions);
    }

    #[tokio::test]
    async fn test_missing_resource_is_not_found() {
        let store = MemoryStore::new();
        let someone = user(&store, "someone@example.com").await;
        let err = resolver(&store)
            .check_gift_card_access(someone, GiftCardId::new())
            .await
            .expect_err("missing");
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_stranger_is_denied_even_on_unowned_resource() {
        let store = MemoryStore::new();
        let stranger = user(&store, "stranger@example.com").await;
        let voucher = store
            .create_voucher(&NewVoucher {
                owner_id: None,
                name: "Imported".into(),
                code: "IMP".into(),
                expires_on: None,
            })
            .await
            .expect("create voucher");

        let err = resolver(&store)
            .check_voucher_access(stranger, voucher.id)
            .await
            .expect_err("denied");
        assert_eq!(err.kind, ErrorKind::AccessDenied);
    }

    #[tokio::test]
    async fn test_share_grants_its_bits() {
        let store = MemoryStore::new();
        let owner = user(&store, "owner@example.com").await;
        let friend = user(&store, "friend@example.com").await;
        let gift_card = store
            .create_gift_card(&NewGiftCard {
                owner_id: Some(owner),
                name: "Books".into(),
                code: "GC-9".into(),
                initial_balance: Decimal::new(5000, 2),
            })
            .await
            .expect("create gift card");
        ShareRepository::create(
            &store,
            &NewShare {
                resource: gift_card.id.into(),
                shared_with: friend,
                capabilities: ShareCapabilities::GiftCard {
                    can_edit: false,
                    can_delete: false,
                    can_edit_transactions: true,
                },
            },
        )
        .await
        .expect("share");

        let p = resolver(&store)
            .check_access(friend, ResourceRef::GiftCard(gift_card.id))
            .await
            .expect("shared access");
        assert_eq!(
            p,
            Permissions {
                is_owner: false,
                can_view: true,
                can_edit: false,
                can_delete: false,
                can_edit_transactions: true,
            }
        );
    }
}
