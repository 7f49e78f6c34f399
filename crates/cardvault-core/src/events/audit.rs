//! Audit records emitted after state-changing operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{ResourceKind, ResourceRef, UserId};

/// Actions recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// A resource was created.
    #[serde(rename = "resource.create")]
    ResourceCreated,
    /// A resource was deleted.
    #[serde(rename = "resource.delete")]
    ResourceDeleted,
    /// A share was granted.
    #[serde(rename = "share.create")]
    ShareCreated,
    /// A share's capability bits changed.
    #[serde(rename = "share.update")]
    ShareUpdated,
    /// A share was revoked.
    #[serde(rename = "share.revoke")]
    ShareRevoked,
    /// A gift card transaction was recorded.
    #[serde(rename = "transaction.create")]
    TransactionCreated,
    /// A gift card transaction was deleted.
    #[serde(rename = "transaction.delete")]
    TransactionDeleted,
}

impl AuditAction {
    /// Return the dotted action name stored in the audit log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResourceCreated => "resource.create",
            Self::ResourceDeleted => "resource.delete",
            Self::ShareCreated => "share.create",
            Self::ShareUpdated => "share.update",
            Self::ShareRevoked => "share.revoke",
            Self::TransactionCreated => "transaction.create",
            Self::TransactionDeleted => "transaction.delete",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One audit record: who did what to which resource, with a JSON snapshot
/// of the affected row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// The action performed.
    pub action: AuditAction,
    /// Kind of the affected resource.
    pub resource_type: ResourceKind,
    /// ID of the affected resource.
    pub resource_id: Uuid,
    /// The user who performed the action.
    pub actor_id: UserId,
    /// Snapshot of the affected row (pre-deletion for deletes).
    pub snapshot: serde_json::Value,
    /// When the action happened.
    pub occurred_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Build a record, serializing `snapshot` to JSON.
    ///
    /// A snapshot that fails to serialize is stored as `null`; auditing
    /// never fails the operation it describes.
    pub fn new<S: Serialize>(
        action: AuditAction,
        resource: ResourceRef,
        actor_id: UserId,
        snapshot: &S,
    ) -> Self {
        Self {
            action,
            resource_type: resource.kind(),
            resource_id: resource.uuid(),
            actor_id,
            snapshot: serde_json::to_value(snapshot).unwrap_or(serde_json::Value::Null),
            occurred_at: Utc::now(),
        }
    }
}
