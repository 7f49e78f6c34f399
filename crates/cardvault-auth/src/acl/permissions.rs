//! The permission model: resource kind plus ownership and share facts in,
//! capability set out.
//!
//! Resolution is pure and total. A caller with neither ownership nor a
//! share gets [`Permissions::none`]; turning that into an error is the
//! resolver's job.

use std::fmt;

use serde::{Deserialize, Serialize};

use cardvault_core::error::AppError;
use cardvault_core::result::AppResult;
use cardvault_core::types::ResourceKind;
use cardvault_entity::share::ShareCapabilities;

/// A single permission a caller may need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Read the resource.
    View,
    /// Modify the resource.
    Edit,
    /// Delete the resource.
    Delete,
    /// Create and delete gift card transactions.
    EditTransactions,
    /// Act as the owner (share management).
    Own,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::EditTransactions => "edit transactions",
            Self::Own => "own",
        };
        write!(f, "{name}")
    }
}

/// Effective permissions of one user on one resource.
///
/// Computed per request; never persisted or cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permissions {
    /// The user owns the resource.
    pub is_owner: bool,
    /// The user may read the resource.
    pub can_view: bool,
    /// The user may modify the resource.
    pub can_edit: bool,
    /// The user may delete the resource.
    pub can_delete: bool,
    /// The user may create and delete gift card transactions.
    pub can_edit_transactions: bool,
}

impl Permissions {
    /// No access at all.
    pub const fn none() -> Self {
        Self {
            is_owner: false,
            can_view: false,
            can_edit: false,
            can_delete: false,
            can_edit_transactions: false,
        }
    }

    /// Full owner access to a resource of `kind`.
    pub fn owner(kind: ResourceKind) -> Self {
        Self {
            is_owner: true,
            can_view: true,
            can_edit: true,
            can_delete: true,
            can_edit_transactions: kind == ResourceKind::GiftCard,
        }
    }

    /// Whether `capability` is granted.
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::View => self.can_view,
            Capability::Edit => self.can_edit,
            Capability::Delete => self.can_delete,
            Capability::EditTransactions => self.can_edit_transactions,
            Capability::Own => self.is_owner,
        }
    }

    /// Fail with `AccessDenied` unless `capability` is granted.
    pub fn require(&self, capability: Capability) -> AppResult<()> {
        if self.allows(capability) {
            Ok(())
        } else {
            Err(AppError::access_denied(format!(
                "Permission to {capability} is not granted"
            )))
        }
    }
}

/// Resolve the permissions of a user on a resource of `kind`.
///
/// `share` is the share granted to the user, if any; it is ignored for
/// owners.
pub fn resolve(
    kind: ResourceKind,
    is_owner: bool,
    share: Option<&ShareCapabilities>,
) -> Permissions {
    if is_owner {
        return Permissions::owner(kind);
    }

    let Some(share) = share else {
        return Permissions::none();
    };

    match kind {
        ResourceKind::Voucher => Permissions {
            can_view: true,
            ..Permissions::none()
        },
        ResourceKind::Card => Permissions {
            can_view: true,
            can_edit: share.can_edit(),
            can_delete: share.can_delete(),
            ..Permissions::none()
        },
        ResourceKind::GiftCard => Permissions {
            can_view: true,
            can_edit: share.can_edit(),
            can_delete: share.can_delete(),
            can_edit_transactions: share.can_edit_transactions(),
            ..Permissions::none()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every share input the model can be handed, across all kinds.
    fn all_shares() -> Vec<Option<ShareCapabilities>> {
        let mut shares = vec![None, Some(ShareCapabilities::Voucher)];
        for can_edit in [false, true] {
            for can_delete in [false, true] {
                shares.push(Some(ShareCapabilities::Card {
                    can_edit,
                    can_delete,
                }));
                for can_edit_transactions in [false, true] {
                    shares.push(Some(ShareCapabilities::GiftCard {
                        can_edit,
                        can_delete,
                        can_edit_transactions,
                    }));
                }
            }
        }
        shares
    }

    #[test]
    fn test_owner_gets_full_access_regardless_of_share() {
        for kind in ResourceKind::ALL {
            for share in all_shares() {
                let p = resolve(kind, true, share.as_ref());
                assert!(p.is_owner && p.can_view && p.can_edit && p.can_delete, "{kind}");
                assert_eq!(p.can_edit_transactions, kind == ResourceKind::GiftCard);
            }
        }
    }

    #[test]
    fn test_voucher_share_is_view_only() {
        for share in all_shares().into_iter().flatten() {
            let p = resolve(ResourceKind::Voucher, false, Some(&share));
            assert_eq!(
                p,
                Permissions {
                    can_view: true,
                    ..Permissions::none()
                }
            );
        }
    }

    #[test]
    fn test_no_owner_no_share_is_no_access() {
        for kind in ResourceKind::ALL {
            assert_eq!(resolve(kind, false, None), Permissions::none());
        }
    }

    #[test]
    fn test_share_bits_are_copied() {
        let cases = [
            (false, false, false),
            (true, false, false),
            (false, true, false),
            (false, false, true),
            (true, true, true),
        ];
        for (can_edit, can_delete, can_edit_transactions) in cases {
            let share = ShareCapabilities::GiftCard {
                can_edit,
                can_delete,
                can_edit_transactions,
            };
            let p = resolve(ResourceKind::GiftCard, false, Some(&share));
            assert!(p.can_view);
            assert!(!p.is_owner);
            assert_eq!(p.can_edit, can_edit);
            assert_eq!(p.can_delete, can_delete);
            assert_eq!(p.can_edit_transactions, can_edit_transactions);
        }
    }

    #[test]
    fn test_card_share_never_edits_transactions() {
        let share = ShareCapabilities::GiftCard {
            can_edit: true,
            can_delete: true,
            can_edit_transactions: true,
        };
        let p = resolve(ResourceKind::Card, false, Some(&share));
        assert!(p.can_edit && p.can_delete);
        assert!(!p.can_edit_transactions);
    }

    #[test]
    fn test_require() {
        let p = resolve(ResourceKind::Voucher, false, Some(&ShareCapabilities::Voucher));
        assert!(p.require(Capability::View).is_ok());
        let err = p.require(Capability::Edit).expect_err("edit not granted");
        assert_eq!(err.kind, cardvault_core::error::ErrorKind::AccessDenied);
    }
}
