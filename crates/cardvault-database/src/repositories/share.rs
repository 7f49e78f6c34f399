//! Share store.
//!
//! Each resource kind keeps its shares in its own table. Queries project
//! every table onto the same column set so one row type covers all three.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use cardvault_core::error::AppError;
use cardvault_core::result::AppResult;
use cardvault_core::types::{ResourceKind, ResourceRef, ShareId, UserId};
use cardvault_entity::share::{NewShare, Share, ShareCapabilities};

use crate::error::map_db_error;

/// Create, update, revoke and list shares.
#[async_trait]
pub trait ShareRepository: Send + Sync + Debug + 'static {
    /// Find a share of any kind by ID.
    async fn find_by_id(&self, id: ShareId) -> AppResult<Option<Share>>;

    /// Find the share of `resource` granted to `user`.
    async fn find_for_user(
        &self,
        resource: ResourceRef,
        user: UserId,
    ) -> AppResult<Option<Share>>;

    /// List every share of `resource`, oldest first.
    async fn list_for_resource(&self, resource: ResourceRef) -> AppResult<Vec<Share>>;

    /// List shares granted to `user`, optionally restricted to one kind,
    /// oldest first.
    async fn list_shared_with(
        &self,
        user: UserId,
        kind: Option<ResourceKind>,
    ) -> AppResult<Vec<Share>>;

    /// Insert a share. A second share for the same (resource, user) pair is
    /// a `Conflict`.
    async fn create(&self, data: &NewShare) -> AppResult<Share>;

    /// Replace the capability bits of a share. `None` if it does not exist.
    async fn update_capabilities(
        &self,
        id: ShareId,
        capabilities: ShareCapabilities,
    ) -> AppResult<Option<Share>>;

    /// Delete a share. Returns `false` if it did not exist.
    async fn delete(&self, id: ShareId) -> AppResult<bool>;
}

/// A share row from any of the three share tables.
#[derive(Debug, Clone, FromRow)]
struct ShareRow {
    id: ShareId,
    resource_kind: ResourceKind,
    resource_id: Uuid,
    shared_with_user_id: UserId,
    can_edit: bool,
    can_delete: bool,
    can_edit_transactions: bool,
    created_at: DateTime<Utc>,
}

impl From<ShareRow> for Share {
    fn from(row: ShareRow) -> Self {
        let capabilities = match row.resource_kind {
            ResourceKind::Card => ShareCapabilities::Card {
                can_edit: row.can_edit,
                can_delete: row.can_delete,
            },
            ResourceKind::Voucher => ShareCapabilities::Voucher,
            ResourceKind::GiftCard => ShareCapabilities::GiftCard {
                can_edit: row.can_edit,
                can_delete: row.can_delete,
                can_edit_transactions: row.can_edit_transactions,
            },
        };
        Share {
            id: row.id,
            resource: ResourceRef::from_parts(row.resource_kind, row.resource_id),
            shared_with: row.shared_with_user_id,
            capabilities,
            created_at: row.created_at,
        }
    }
}

fn share_table(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Card => "card_shares",
        ResourceKind::Voucher => "voucher_shares",
        ResourceKind::GiftCard => "gift_card_shares",
    }
}

fn resource_column(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Card => "card_id",
        ResourceKind::Voucher => "voucher_id",
        ResourceKind::GiftCard => "gift_card_id",
    }
}

/// Column list projecting a share table onto [`ShareRow`].
fn share_columns(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Card => {
            "id, 'card'::resource_kind AS resource_kind, card_id AS resource_id, \
             shared_with_user_id, can_edit, can_delete, \
             FALSE AS can_edit_transactions, created_at"
        }
        ResourceKind::Voucher => {
            "id, 'voucher'::resource_kind AS resource_kind, voucher_id AS resource_id, \
             shared_with_user_id, FALSE AS can_edit, FALSE AS can_delete, \
             FALSE AS can_edit_transactions, created_at"
        }
        ResourceKind::GiftCard => {
            "id, 'gift_card'::resource_kind AS resource_kind, gift_card_id AS resource_id, \
             shared_with_user_id, can_edit, can_delete, can_edit_transactions, created_at"
        }
    }
}

/// PostgreSQL share repository.
#[derive(Debug, Clone)]
pub struct PgShareRepository {
    pool: PgPool,
}

impl PgShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_in(&self, kind: ResourceKind, id: ShareId) -> AppResult<Option<Share>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            share_columns(kind),
            share_table(kind)
        );
        let row = sqlx::query_as::<_, ShareRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error("Failed to find share"))?;
        Ok(row.map(Share::from))
    }
}

#[async_trait]
impl ShareRepository for PgShareRepository {
    async fn find_by_id(&self, id: ShareId) -> AppResult<Option<Share>> {
        for kind in ResourceKind::ALL {
            if let Some(share) = self.find_in(kind, id).await? {
                return Ok(Some(share));
            }
        }
        Ok(None)
    }

    async fn find_for_user(
        &self,
        resource: ResourceRef,
        user: UserId,
    ) -> AppResult<Option<Share>> {
        let kind = resource.kind();
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = $1 AND shared_with_user_id = $2",
            share_columns(kind),
            share_table(kind),
            resource_column(kind)
        );
        let row = sqlx::query_as::<_, ShareRow>(&sql)
            .bind(resource.uuid())
            .bind(user)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error("Failed to find share for user"))?;
        Ok(row.map(Share::from))
    }

    async fn list_for_resource(&self, resource: ResourceRef) -> AppResult<Vec<Share>> {
        let kind = resource.kind();
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = $1 ORDER BY created_at, id",
            share_columns(kind),
            share_table(kind),
            resource_column(kind)
        );
        let rows = sqlx::query_as::<_, ShareRow>(&sql)
            .bind(resource.uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error("Failed to list shares"))?;
        Ok(rows.into_iter().map(Share::from).collect())
    }

    async fn list_shared_with(
        &self,
        user: UserId,
        kind: Option<ResourceKind>,
    ) -> AppResult<Vec<Share>> {
        let kinds: Vec<ResourceKind> = match kind {
            Some(k) => vec![k],
            None => ResourceKind::ALL.to_vec(),
        };

        let mut shares = Vec::new();
        for kind in kinds {
            let sql = format!(
                "SELECT {} FROM {} WHERE shared_with_user_id = $1 ORDER BY created_at, id",
                share_columns(kind),
                share_table(kind)
            );
            let rows = sqlx::query_as::<_, ShareRow>(&sql)
                .bind(user)
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_error("Failed to list shares for recipient"))?;
            shares.extend(rows.into_iter().map(Share::from));
        }
        shares.sort_by_key(|s| s.created_at);
        Ok(shares)
    }

    async fn create(&self, data: &NewShare) -> AppResult<Share> {
        let id = ShareId::new();
        let now = Utc::now();
        let kind = data.resource.kind();
        let columns = share_columns(kind);

        let row = match data.capabilities {
            ShareCapabilities::Card {
                can_edit,
                can_delete,
            } if kind == ResourceKind::Card => {
                let sql = format!(
                    "INSERT INTO card_shares \
                     (id, card_id, shared_with_user_id, can_edit, can_delete, created_at) \
                     VALUES ($1, $2, $3, $4, $5, $6) RETURNING {columns}"
                );
                sqlx::query_as::<_, ShareRow>(&sql)
                    .bind(id)
                    .bind(data.resource.uuid())
                    .bind(data.shared_with)
                    .bind(can_edit)
                    .bind(can_delete)
                    .bind(now)
                    .fetch_one(&self.pool)
                    .await
            }
            ShareCapabilities::Voucher if kind == ResourceKind::Voucher => {
                let sql = format!(
                    "INSERT INTO voucher_shares \
                     (id, voucher_id, shared_with_user_id, created_at) \
                     VALUES ($1, $2, $3, $4) RETURNING {columns}"
                );
                sqlx::query_as::<_, ShareRow>(&sql)
                    .bind(id)
                    .bind(data.resource.uuid())
                    .bind(data.shared_with)
                    .bind(now)
                    .fetch_one(&self.pool)
                    .await
            }
            ShareCapabilities::GiftCard {
                can_edit,
                can_delete,
                can_edit_transactions,
            } if kind == ResourceKind::GiftCard => {
                let sql = format!(
                    "INSERT INTO gift_card_shares \
                     (id, gift_card_id, shared_with_user_id, can_edit, can_delete, \
                      can_edit_transactions, created_at) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {columns}"
                );
                sqlx::query_as::<_, ShareRow>(&sql)
                    .bind(id)
                    .bind(data.resource.uuid())
                    .bind(data.shared_with)
                    .bind(can_edit)
                    .bind(can_delete)
                    .bind(can_edit_transactions)
                    .bind(now)
                    .fetch_one(&self.pool)
                    .await
            }
            _ => {
                return Err(AppError::validation(format!(
                    "Capabilities for {} do not apply to a {kind}",
                    data.capabilities.kind()
                )));
            }
        };

        row.map(Share::from)
            .map_err(map_db_error("Failed to create share"))
    }

    async fn update_capabilities(
        &self,
        id: ShareId,
        capabilities: ShareCapabilities,
    ) -> AppResult<Option<Share>> {
        let row = match capabilities {
            ShareCapabilities::Card {
                can_edit,
                can_delete,
            } => {
                let sql = format!(
                    "UPDATE card_shares SET can_edit = $2, can_delete = $3 \
                     WHERE id = $1 RETURNING {}",
                    share_columns(ResourceKind::Card)
                );
                sqlx::query_as::<_, ShareRow>(&sql)
                    .bind(id)
                    .bind(can_edit)
                    .bind(can_delete)
                    .fetch_optional(&self.pool)
                    .await
            }
            ShareCapabilities::GiftCard {
                can_edit,
                can_delete,
                can_edit_transactions,
            } => {
                let sql = format!(
                    "UPDATE gift_card_shares \
                     SET can_edit = $2, can_delete = $3, can_edit_transactions = $4 \
                     WHERE id = $1 RETURNING {}",
                    share_columns(ResourceKind::GiftCard)
                );
                sqlx::query_as::<_, ShareRow>(&sql)
                    .bind(id)
                    .bind(can_edit)
                    .bind(can_delete)
                    .bind(can_edit_transactions)
                    .fetch_optional(&self.pool)
                    .await
            }
            ShareCapabilities::Voucher => {
                return Err(AppError::validation("Voucher shares have no capabilities"));
            }
        };

        row.map(|r| r.map(Share::from))
            .map_err(map_db_error("Failed to update share"))
    }

    async fn delete(&self, id: ShareId) -> AppResult<bool> {
        for kind in ResourceKind::ALL {
            let sql = format!("DELETE FROM {} WHERE id = $1", share_table(kind));
            let result = sqlx::query(&sql)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(map_db_error("Failed to delete share"))?;
            if result.rows_affected() > 0 {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voucher_row_maps_to_read_only_share() {
        let row = ShareRow {
            id: ShareId::new(),
            resource_kind: ResourceKind::Voucher,
            resource_id: Uuid::new_v4(),
            shared_with_user_id: UserId::new(),
            can_edit: true,
            can_delete: true,
            can_edit_transactions: true,
            created_at: Utc::now(),
        };
        let share = Share::from(row);
        assert_eq!(share.capabilities, ShareCapabilities::Voucher);
        assert_eq!(share.resource.kind(), ResourceKind::Voucher);
    }

    #[test]
    fn test_every_kind_projects_the_same_columns() {
        for kind in ResourceKind::ALL {
            let cols = share_columns(kind);
            for name in [
                "resource_kind",
                "resource_id",
                "shared_with_user_id",
                "can_edit",
                "can_delete",
                "can_edit_transactions",
                "created_at",
            ] {
                assert!(cols.contains(name), "{kind} projection lacks {name}");
            }
        }
    }
}
