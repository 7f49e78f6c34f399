//! Gift card entity model and its derived balance.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cardvault_core::types::{GiftCardId, UserId};

/// A prepaid gift card.
///
/// `initial_balance` is fixed at creation. The current balance is never
/// stored; see [`GiftCardBalance`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GiftCard {
    /// Unique gift card identifier.
    pub id: GiftCardId,
    /// Owning user. `None` for imported, unowned gift cards.
    pub owner_id: Option<UserId>,
    /// Display name.
    pub name: String,
    /// Card code.
    pub code: String,
    /// Value loaded onto the card when it was issued.
    pub initial_balance: Decimal,
    /// When the gift card was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new gift card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGiftCard {
    /// Owning user.
    pub owner_id: Option<UserId>,
    /// Display name.
    pub name: String,
    /// Card code.
    pub code: String,
    /// Initial balance, must be non-negative.
    pub initial_balance: Decimal,
}

/// Balance of a gift card derived from its active transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCardBalance {
    /// The gift card.
    pub gift_card_id: GiftCardId,
    /// Value loaded at creation.
    pub initial_balance: Decimal,
    /// Sum of all active (non-deleted) transaction amounts.
    pub spent: Decimal,
    /// `initial_balance - spent`.
    pub current: Decimal,
}

impl GiftCardBalance {
    /// Derive a balance from the initial value and the active spend.
    pub fn new(gift_card_id: GiftCardId, initial_balance: Decimal, spent: Decimal) -> Self {
        Self {
            gift_card_id,
            initial_balance,
            spent,
            current: initial_balance - spent,
        }
    }

    /// Whether a debit of `amount` fits in the current balance.
    pub fn covers(&self, amount: Decimal) -> bool {
        amount <= self.current
    }
}
