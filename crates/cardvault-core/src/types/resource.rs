//! The three resource kinds and a typed reference to one resource.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::id::{CardId, GiftCardId, VoucherId};
use crate::error::AppError;

/// Kind of an ownable, shareable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "resource_kind", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A loyalty card.
    Card,
    /// A discount voucher. Always read-only for anyone but its owner.
    Voucher,
    /// A prepaid gift card with a balance ledger.
    GiftCard,
}

impl ResourceKind {
    /// All kinds, in declaration order.
    pub const ALL: [ResourceKind; 3] = [Self::Card, Self::Voucher, Self::GiftCard];

    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Voucher => "voucher",
            Self::GiftCard => "gift_card",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "voucher" => Ok(Self::Voucher),
            "gift_card" | "giftcard" => Ok(Self::GiftCard),
            _ => Err(AppError::validation(format!(
                "Invalid resource kind: '{s}'"
            ))),
        }
    }
}

/// A reference to exactly one resource, tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ResourceRef {
    /// A loyalty card.
    Card(CardId),
    /// A discount voucher.
    Voucher(VoucherId),
    /// A prepaid gift card.
    GiftCard(GiftCardId),
}

impl ResourceRef {
    /// Build a reference from a kind and a raw UUID.
    pub fn from_parts(kind: ResourceKind, id: Uuid) -> Self {
        match kind {
            ResourceKind::Card => Self::Card(CardId(id)),
            ResourceKind::Voucher => Self::Voucher(VoucherId(id)),
            ResourceKind::GiftCard => Self::GiftCard(GiftCardId(id)),
        }
    }

    /// The kind of the referenced resource.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Card(_) => ResourceKind::Card,
            Self::Voucher(_) => ResourceKind::Voucher,
            Self::GiftCard(_) => ResourceKind::GiftCard,
        }
    }

    /// The raw UUID of the referenced resource.
    pub fn uuid(&self) -> Uuid {
        match self {
            Self::Card(id) => id.0,
            Self::Voucher(id) => id.0,
            Self::GiftCard(id) => id.0,
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.uuid())
    }
}

impl From<CardId> for ResourceRef {
    fn from(id: CardId) -> Self {
        Self::Card(id)
    }
}

impl From<VoucherId> for ResourceRef {
    fn from(id: VoucherId) -> Self {
        Self::Voucher(id)
    }
}

impl From<GiftCardId> for ResourceRef {
    fn from(id: GiftCardId) -> Self {
        Self::GiftCard(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in ResourceKind::ALL {
            let parsed: ResourceKind = kind.as_str().parse().expect("parse");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_from_parts_preserves_kind_and_id() {
        let uuid = Uuid::new_v4();
        let r = ResourceRef::from_parts(ResourceKind::GiftCard, uuid);
        assert_eq!(r, ResourceRef::GiftCard(GiftCardId(uuid)));
        assert_eq!(r.kind(), ResourceKind::GiftCard);
        assert_eq!(r.uuid(), uuid);
    }

    #[test]
    fn test_display() {
        let uuid = Uuid::new_v4();
        let r = ResourceRef::Voucher(VoucherId(uuid));
        assert_eq!(r.to_string(), format!("voucher:{uuid}"));
    }
}
