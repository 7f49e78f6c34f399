//! Share entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cardvault_core::types::{ResourceRef, ShareId, UserId};

use super::capability::ShareCapabilities;

/// A share granting one user access to one resource.
///
/// At most one share exists per (resource, recipient) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Share {
    /// Unique share identifier.
    pub id: ShareId,
    /// The shared resource.
    pub resource: ResourceRef,
    /// The user the resource is shared with.
    pub shared_with: UserId,
    /// Capability bits. Always matches `resource.kind()`.
    pub capabilities: ShareCapabilities,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShare {
    /// The resource to share.
    pub resource: ResourceRef,
    /// Recipient.
    pub shared_with: UserId,
    /// Capability bits, already normalized for the resource kind.
    pub capabilities: ShareCapabilities,
}
