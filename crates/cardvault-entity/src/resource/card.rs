//! Loyalty card entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cardvault_core::types::{CardId, UserId};

/// A loyalty card.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Card {
    /// Unique card identifier.
    pub id: CardId,
    /// Owning user. `None` for imported, unowned cards.
    pub owner_id: Option<UserId>,
    /// Display name.
    pub name: String,
    /// Card number printed on the card or encoded in its barcode.
    pub card_number: Option<String>,
    /// When the card was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCard {
    /// Owning user.
    pub owner_id: Option<UserId>,
    /// Display name.
    pub name: String,
    /// Card number.
    pub card_number: Option<String>,
}
