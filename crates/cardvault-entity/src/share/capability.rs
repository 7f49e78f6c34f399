//! Capability bits carried by a share, one variant per resource kind.

use serde::{Deserialize, Serialize};

use cardvault_core::types::ResourceKind;

/// Capability bits granted by a share.
///
/// Each resource kind has its own set of bits; voucher shares carry none
/// and are always read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShareCapabilities {
    /// Share of a loyalty card.
    Card {
        /// Recipient may edit the card.
        can_edit: bool,
        /// Recipient may delete the card.
        can_delete: bool,
    },
    /// Share of a voucher. Read-only.
    Voucher,
    /// Share of a gift card.
    GiftCard {
        /// Recipient may edit the gift card.
        can_edit: bool,
        /// Recipient may delete the gift card.
        can_delete: bool,
        /// Recipient may create and delete transactions.
        can_edit_transactions: bool,
    },
}

impl ShareCapabilities {
    /// A share of `kind` with every bit cleared.
    pub fn read_only(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Card => Self::Card {
                can_edit: false,
                can_delete: false,
            },
            ResourceKind::Voucher => Self::Voucher,
            ResourceKind::GiftCard => Self::GiftCard {
                can_edit: false,
                can_delete: false,
                can_edit_transactions: false,
            },
        }
    }

    /// The resource kind these capabilities apply to.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Card { .. } => ResourceKind::Card,
            Self::Voucher => ResourceKind::Voucher,
            Self::GiftCard { .. } => ResourceKind::GiftCard,
        }
    }

    /// Edit bit.
    pub fn can_edit(&self) -> bool {
        match *self {
            Self::Card { can_edit, .. } | Self::GiftCard { can_edit, .. } => can_edit,
            Self::Voucher => false,
        }
    }

    /// Delete bit.
    pub fn can_delete(&self) -> bool {
        match *self {
            Self::Card { can_delete, .. } | Self::GiftCard { can_delete, .. } => can_delete,
            Self::Voucher => false,
        }
    }

    /// Transaction-edit bit. Only gift card shares carry it.
    pub fn can_edit_transactions(&self) -> bool {
        match *self {
            Self::GiftCard {
                can_edit_transactions,
                ..
            } => can_edit_transactions,
            _ => false,
        }
    }

    /// Fit these capabilities to a resource of `kind`.
    ///
    /// Any input is coerced to [`ShareCapabilities::Voucher`] for a voucher.
    /// For other kinds the variant must match; `None` means it does not.
    pub fn normalized_for(self, kind: ResourceKind) -> Option<Self> {
        match kind {
            ResourceKind::Voucher => Some(Self::Voucher),
            _ if self.kind() == kind => Some(self),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_GIFT_CARD: ShareCapabilities = ShareCapabilities::GiftCard {
        can_edit: true,
        can_delete: true,
        can_edit_transactions: true,
    };

    #[test]
    fn test_voucher_input_is_coerced_to_read_only() {
        assert_eq!(
            FULL_GIFT_CARD.normalized_for(ResourceKind::Voucher),
            Some(ShareCapabilities::Voucher)
        );
    }

    #[test]
    fn test_mismatched_kind_is_rejected() {
        assert_eq!(FULL_GIFT_CARD.normalized_for(ResourceKind::Card), None);
        assert_eq!(
            ShareCapabilities::Voucher.normalized_for(ResourceKind::GiftCard),
            None
        );
    }

    #[test]
    fn test_bits() {
        let card = ShareCapabilities::Card {
            can_edit: true,
            can_delete: false,
        };
        assert!(card.can_edit());
        assert!(!card.can_delete());
        assert!(!card.can_edit_transactions());
        assert!(FULL_GIFT_CARD.can_edit_transactions());
        assert!(!ShareCapabilities::read_only(ResourceKind::GiftCard).can_edit());
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(FULL_GIFT_CARD).expect("serialize");
        assert_eq!(json["kind"], "gift_card");
        assert_eq!(json["can_edit_transactions"], true);
        let back: ShareCapabilities =
            serde_json::from_value(serde_json::json!({ "kind": "voucher" })).expect("parse");
        assert_eq!(back, ShareCapabilities::Voucher);
    }
}
