//! Gift card ledger storage.
//!
//! Creating a transaction is a check-then-insert sequence that must be
//! serialized per gift card. [`LedgerRepository::begin`] opens a
//! [`LedgerUnitOfWork`] that holds the gift card's lock for its whole
//! lifetime and exposes the balance read under that lock. Dropping a unit
//! of work without committing discards everything it staged.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use cardvault_core::error::AppError;
use cardvault_core::result::AppResult;
use cardvault_core::types::{GiftCardId, TransactionId, UserId};
use cardvault_entity::ledger::{GiftCardTransaction, NewTransaction};
use cardvault_entity::resource::GiftCardBalance;

use crate::error::map_db_error;

/// An open, exclusive unit of work on one gift card's ledger.
#[async_trait]
pub trait LedgerUnitOfWork: Send {
    /// Balance as seen inside this unit of work, including staged inserts.
    fn balance(&self) -> GiftCardBalance;

    /// Stage a transaction. May fail with `BalanceConstraint` if the
    /// storage layer rejects it.
    async fn insert(&mut self, data: &NewTransaction) -> AppResult<GiftCardTransaction>;

    /// Make every staged insert durable and release the lock.
    async fn commit(&mut self) -> AppResult<()>;
}

/// Balance ledger storage.
#[async_trait]
pub trait LedgerRepository: Send + Sync + Debug + 'static {
    /// Lock `gift_card` and open a unit of work on it. `None` if the gift
    /// card does not exist.
    async fn begin(&self, gift_card: GiftCardId) -> AppResult<Option<Box<dyn LedgerUnitOfWork>>>;

    /// Read the current balance without locking.
    async fn balance(&self, gift_card: GiftCardId) -> AppResult<Option<GiftCardBalance>>;

    /// List a gift card's transactions ordered by transaction date.
    async fn list_transactions(
        &self,
        gift_card: GiftCardId,
        include_deleted: bool,
    ) -> AppResult<Vec<GiftCardTransaction>>;

    /// Find a transaction by ID, deleted or not.
    async fn find_transaction(&self, id: TransactionId) -> AppResult<Option<GiftCardTransaction>>;

    /// Soft-delete an active transaction. `None` if it does not exist or
    /// is already deleted.
    async fn mark_deleted(
        &self,
        id: TransactionId,
        deleted_by: UserId,
    ) -> AppResult<Option<GiftCardTransaction>>;
}

/// PostgreSQL ledger repository.
#[derive(Debug, Clone)]
pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    /// Create a new ledger repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn active_spend(
    conn: &mut sqlx::PgConnection,
    gift_card: GiftCardId,
) -> AppResult<Decimal> {
    sqlx::query_scalar::<_, Decimal>(
        "SELECT COALESCE(SUM(amount), 0) FROM gift_card_transactions \
         WHERE gift_card_id = $1 AND deleted_at IS NULL",
    )
    .bind(gift_card)
    .fetch_one(conn)
    .await
    .map_err(map_db_error("Failed to sum gift card transactions"))
}

#[async_trait]
impl LedgerRepository for PgLedgerRepository {
    async fn begin(&self, gift_card: GiftCardId) -> AppResult<Option<Box<dyn LedgerUnitOfWork>>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_error("Failed to begin ledger transaction"))?;

        let initial: Option<Decimal> = sqlx::query_scalar(
            "SELECT initial_balance FROM gift_cards WHERE id = $1 FOR UPDATE",
        )
        .bind(gift_card)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error("Failed to lock gift card"))?;

        let Some(initial) = initial else {
            return Ok(None);
        };

        let spent = active_spend(&mut tx, gift_card).await?;
        debug!(gift_card_id = %gift_card, %initial, %spent, "Gift card locked");

        Ok(Some(Box::new(PgLedgerUnitOfWork {
            tx: Some(tx),
            balance: GiftCardBalance::new(gift_card, initial, spent),
        })))
    }

    async fn balance(&self, gift_card: GiftCardId) -> AppResult<Option<GiftCardBalance>> {
        let row: Option<(Decimal, Decimal)> = sqlx::query_as(
            "SELECT g.initial_balance, \
                    COALESCE(SUM(t.amount) FILTER (WHERE t.deleted_at IS NULL), 0) \
             FROM gift_cards g \
             LEFT JOIN gift_card_transactions t ON t.gift_card_id = g.id \
             WHERE g.id = $1 GROUP BY g.id",
        )
        .bind(gift_card)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Failed to read gift card balance"))?;

        Ok(row.map(|(initial, spent)| GiftCardBalance::new(gift_card, initial, spent)))
    }

    async fn list_transactions(
        &self,
        gift_card: GiftCardId,
        include_deleted: bool,
    ) -> AppResult<Vec<GiftCardTransaction>> {
        sqlx::query_as::<_, GiftCardTransaction>(
            "SELECT * FROM gift_card_transactions \
             WHERE gift_card_id = $1 AND ($2 OR deleted_at IS NULL) \
             ORDER BY transaction_date, created_at",
        )
        .bind(gift_card)
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("Failed to list gift card transactions"))
    }

    async fn find_transaction(&self, id: TransactionId) -> AppResult<Option<GiftCardTransaction>> {
        sqlx::query_as::<_, GiftCardTransaction>(
            "SELECT * FROM gift_card_transactions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Failed to find gift card transaction"))
    }

    async fn mark_deleted(
        &self,
        id: TransactionId,
        deleted_by: UserId,
    ) -> AppResult<Option<GiftCardTransaction>> {
        sqlx::query_as::<_, GiftCardTransaction>(
            "UPDATE gift_card_transactions SET deleted_at = $2, deleted_by = $3 \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .bind(Utc::now())
        .bind(deleted_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Failed to delete gift card transaction"))
    }
}

/// Unit of work backed by a database transaction holding `FOR UPDATE` on
/// the gift card row. Dropping it rolls back.
struct PgLedgerUnitOfWork {
    tx: Option<Transaction<'static, Postgres>>,
    balance: GiftCardBalance,
}

impl PgLedgerUnitOfWork {
    fn tx(&mut self) -> AppResult<&mut Transaction<'static, Postgres>> {
        self.tx
            .as_mut()
            .ok_or_else(|| AppError::internal("Ledger unit of work already committed"))
    }
}

#[async_trait]
impl LedgerUnitOfWork for PgLedgerUnitOfWork {
    fn balance(&self) -> GiftCardBalance {
        self.balance
    }

    async fn insert(&mut self, data: &NewTransaction) -> AppResult<GiftCardTransaction> {
        if data.gift_card_id != self.balance.gift_card_id {
            return Err(AppError::internal(
                "Transaction targets a different gift card than the locked one",
            ));
        }

        let tx = self.tx()?;
        let row = sqlx::query_as::<_, GiftCardTransaction>(
            "INSERT INTO gift_card_transactions \
             (id, gift_card_id, amount, description, transaction_date, created_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(TransactionId::new())
        .bind(data.gift_card_id)
        .bind(data.amount)
        .bind(&data.description)
        .bind(data.transaction_date)
        .bind(data.created_by)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await
        .map_err(map_db_error("Failed to insert gift card transaction"))?;

        self.balance = GiftCardBalance::new(
            self.balance.gift_card_id,
            self.balance.initial_balance,
            self.balance.spent + row.amount,
        );
        Ok(row)
    }

    async fn commit(&mut self) -> AppResult<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| AppError::internal("Ledger unit of work already committed"))?;
        tx.commit()
            .await
            .map_err(map_db_error("Failed to commit gift card transaction"))
    }
}
