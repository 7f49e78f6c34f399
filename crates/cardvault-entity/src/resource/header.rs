//! Ownership facts shared by every resource kind.

use serde::{Deserialize, Serialize};

use cardvault_core::types::{ResourceRef, UserId};

/// The part of a resource the access resolver needs: what it is and who
/// owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHeader {
    /// The resource.
    pub resource: ResourceRef,
    /// Owning user, if any.
    pub owner_id: Option<UserId>,
}

impl ResourceHeader {
    /// Whether `user` owns this resource. Unowned resources have no owner.
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_id == Some(user)
    }
}
