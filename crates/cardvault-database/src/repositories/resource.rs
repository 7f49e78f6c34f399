//! Cards, vouchers and gift cards.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use cardvault_core::result::AppResult;
use cardvault_core::types::{CardId, GiftCardId, ResourceKind, ResourceRef, UserId, VoucherId};
use cardvault_entity::resource::{
    Card, GiftCard, NewCard, NewGiftCard, NewVoucher, ResourceHeader, Voucher,
};

use crate::error::map_db_error;

/// Storage of the three resource kinds.
#[async_trait]
pub trait ResourceRepository: Send + Sync + Debug + 'static {
    /// Load the ownership facts of a resource.
    async fn find_header(&self, resource: ResourceRef) -> AppResult<Option<ResourceHeader>>;

    /// Find a card by ID.
    async fn find_card(&self, id: CardId) -> AppResult<Option<Card>>;

    /// Find a voucher by ID.
    async fn find_voucher(&self, id: VoucherId) -> AppResult<Option<Voucher>>;

    /// Find a gift card by ID.
    async fn find_gift_card(&self, id: GiftCardId) -> AppResult<Option<GiftCard>>;

    /// Insert a card.
    async fn create_card(&self, data: &NewCard) -> AppResult<Card>;

    /// Insert a voucher.
    async fn create_voucher(&self, data: &NewVoucher) -> AppResult<Voucher>;

    /// Insert a gift card.
    async fn create_gift_card(&self, data: &NewGiftCard) -> AppResult<GiftCard>;

    /// Delete a resource together with its shares, transactions and
    /// favorites. Returns `false` if it did not exist.
    async fn delete(&self, resource: ResourceRef) -> AppResult<bool>;
}

/// Table holding resources of `kind`.
pub(crate) fn resource_table(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Card => "cards",
        ResourceKind::Voucher => "vouchers",
        ResourceKind::GiftCard => "gift_cards",
    }
}

/// PostgreSQL resource repository.
#[derive(Debug, Clone)]
pub struct PgResourceRepository {
    pool: PgPool,
}

impl PgResourceRepository {
    /// Create a new resource repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceRepository for PgResourceRepository {
    async fn find_header(&self, resource: ResourceRef) -> AppResult<Option<ResourceHeader>> {
        let sql = format!(
            "SELECT owner_id FROM {} WHERE id = $1",
            resource_table(resource.kind())
        );
        let row: Option<(Option<UserId>,)> = sqlx::query_as(&sql)
            .bind(resource.uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error("Failed to load resource owner"))?;

        Ok(row.map(|(owner_id,)| ResourceHeader { resource, owner_id }))
    }

    async fn find_card(&self, id: CardId) -> AppResult<Option<Card>> {
        sqlx::query_as::<_, Card>("SELECT * FROM cards WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error("Failed to find card"))
    }

    async fn find_voucher(&self, id: VoucherId) -> AppResult<Option<Voucher>> {
        sqlx::query_as::<_, Voucher>("SELECT * FROM vouchers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error("Failed to find voucher"))
    }

    async fn find_gift_card(&self, id: GiftCardId) -> AppResult<Option<GiftCard>> {
        sqlx::query_as::<_, GiftCard>("SELECT * FROM gift_cards WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error("Failed to find gift card"))
    }

    async fn create_card(&self, data: &NewCard) -> AppResult<Card> {
        sqlx::query_as::<_, Card>(
            "INSERT INTO cards (id, owner_id, name, card_number, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(CardId::new())
        .bind(data.owner_id)
        .bind(&data.name)
        .bind(&data.card_number)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error("Failed to create card"))
    }

    async fn create_voucher(&self, data: &NewVoucher) -> AppResult<Voucher> {
        sqlx::query_as::<_, Voucher>(
            "INSERT INTO vouchers (id, owner_id, name, code, expires_on, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(VoucherId::new())
        .bind(data.owner_id)
        .bind(&data.name)
        .bind(&data.code)
        .bind(data.expires_on)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error("Failed to create voucher"))
    }

    async fn create_gift_card(&self, data: &NewGiftCard) -> AppResult<GiftCard> {
        sqlx::query_as::<_, GiftCard>(
            "INSERT INTO gift_cards (id, owner_id, name, code, initial_balance, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(GiftCardId::new())
        .bind(data.owner_id)
        .bind(&data.name)
        .bind(&data.code)
        .bind(data.initial_balance)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error("Failed to create gift card"))
    }

    async fn delete(&self, resource: ResourceRef) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", resource_table(resource.kind()));
        let result = sqlx::query(&sql)
            .bind(resource.uuid())
            .execute(&self.pool)
            .await
            .map_err(map_db_error("Failed to delete resource"))?;
        Ok(result.rows_affected() > 0)
    }
}
