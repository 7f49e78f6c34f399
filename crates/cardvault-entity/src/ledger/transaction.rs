//! Gift card transaction entity model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cardvault_core::types::{GiftCardId, TransactionId, UserId};

/// Lifecycle of a transaction. `Deleted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionState {
    /// Counts against the balance.
    Active,
    /// Soft-deleted; no longer counts against the balance.
    Deleted,
}

/// A debit against a gift card. Immutable apart from soft deletion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GiftCardTransaction {
    /// Unique transaction identifier.
    pub id: TransactionId,
    /// The debited gift card.
    pub gift_card_id: GiftCardId,
    /// Debited amount, always strictly positive.
    pub amount: Decimal,
    /// Free-text description.
    pub description: String,
    /// Business date of the purchase.
    pub transaction_date: NaiveDate,
    /// User who recorded the transaction.
    pub created_by: Option<UserId>,
    /// When the transaction was recorded.
    pub created_at: DateTime<Utc>,
    /// When the transaction was deleted.
    pub deleted_at: Option<DateTime<Utc>>,
    /// User who deleted the transaction.
    pub deleted_by: Option<UserId>,
}

impl GiftCardTransaction {
    /// Current lifecycle state.
    pub fn state(&self) -> TransactionState {
        if self.deleted_at.is_some() {
            TransactionState::Deleted
        } else {
            TransactionState::Active
        }
    }

    /// Whether the transaction still counts against the balance.
    pub fn is_active(&self) -> bool {
        self.state() == TransactionState::Active
    }
}

/// Data required to record a new transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    /// The debited gift card.
    pub gift_card_id: GiftCardId,
    /// Debited amount.
    pub amount: Decimal,
    /// Description.
    pub description: String,
    /// Business date.
    pub transaction_date: NaiveDate,
    /// Recording user.
    pub created_by: UserId,
}
