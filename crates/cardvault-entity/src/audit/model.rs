//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use cardvault_core::events::AuditRecord;
use cardvault_core::types::{AuditLogId, ResourceKind, UserId};

/// An immutable, persisted audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: AuditLogId,
    /// The user who performed the action.
    pub actor_id: UserId,
    /// The action that was performed (e.g. `"share.revoke"`).
    pub action: String,
    /// Kind of the affected resource.
    pub resource_type: ResourceKind,
    /// ID of the affected resource.
    pub resource_id: Uuid,
    /// Snapshot of the affected row.
    pub snapshot: serde_json::Value,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

impl From<AuditRecord> for AuditLogEntry {
    fn from(record: AuditRecord) -> Self {
        Self {
            id: AuditLogId::new(),
            actor_id: record.actor_id,
            action: record.action.as_str().to_string(),
            resource_type: record.resource_type,
            resource_id: record.resource_id,
            snapshot: record.snapshot,
            created_at: record.occurred_at,
        }
    }
}
