//! Discount voucher entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cardvault_core::types::{UserId, VoucherId};

/// A discount voucher.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Voucher {
    /// Unique voucher identifier.
    pub id: VoucherId,
    /// Owning user. `None` for imported, unowned vouchers.
    pub owner_id: Option<UserId>,
    /// Display name.
    pub name: String,
    /// Redemption code.
    pub code: String,
    /// Last day the voucher can be redeemed.
    pub expires_on: Option<NaiveDate>,
    /// When the voucher was created.
    pub created_at: DateTime<Utc>,
}

impl Voucher {
    /// Whether the voucher has expired as of `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires_on.is_some_and(|last| last < today)
    }
}

/// Data required to create a new voucher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVoucher {
    /// Owning user.
    pub owner_id: Option<UserId>,
    /// Display name.
    pub name: String,
    /// Redemption code.
    pub code: String,
    /// Expiry date.
    pub expires_on: Option<NaiveDate>,
}
