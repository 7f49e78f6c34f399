//! Audit log persistence and the sink that feeds it.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use cardvault_core::events::AuditRecord;
use cardvault_core::result::AppResult;
use cardvault_core::traits::AuditSink;
use cardvault_core::types::ResourceRef;
use cardvault_entity::audit::AuditLogEntry;

use crate::error::map_db_error;

/// Append-only audit log storage.
#[async_trait]
pub trait AuditLogRepository: Send + Sync + Debug + 'static {
    /// Append one entry.
    async fn append(&self, entry: &AuditLogEntry) -> AppResult<()>;

    /// The most recent entries, newest first.
    async fn list_recent(&self, limit: i64) -> AppResult<Vec<AuditLogEntry>>;

    /// Every entry about one resource, oldest first.
    async fn list_for_resource(&self, resource: ResourceRef) -> AppResult<Vec<AuditLogEntry>>;
}

/// PostgreSQL audit log repository.
#[derive(Debug, Clone)]
pub struct PgAuditLogRepository {
    pool: PgPool,
}

impl PgAuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for PgAuditLogRepository {
    async fn append(&self, entry: &AuditLogEntry) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO audit_log \
             (id, actor_id, action, resource_type, resource_id, snapshot, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(entry.id)
        .bind(entry.actor_id)
        .bind(&entry.action)
        .bind(entry.resource_type)
        .bind(entry.resource_id)
        .bind(&entry.snapshot)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error("Failed to write audit entry"))?;
        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<AuditLogEntry>> {
        sqlx::query_as::<_, AuditLogEntry>(
            "SELECT * FROM audit_log ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("Failed to list audit entries"))
    }

    async fn list_for_resource(&self, resource: ResourceRef) -> AppResult<Vec<AuditLogEntry>> {
        sqlx::query_as::<_, AuditLogEntry>(
            "SELECT * FROM audit_log WHERE resource_type = $1 AND resource_id = $2 \
             ORDER BY created_at",
        )
        .bind(resource.kind())
        .bind(resource.uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("Failed to list audit entries for resource"))
    }
}

/// [`AuditSink`] that appends every record to an [`AuditLogRepository`].
#[derive(Debug, Clone)]
pub struct RepositoryAuditSink {
    repo: Arc<dyn AuditLogRepository>,
}

impl RepositoryAuditSink {
    /// Wrap an audit log repository.
    pub fn new(repo: Arc<dyn AuditLogRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl AuditSink for RepositoryAuditSink {
    async fn record(&self, record: AuditRecord) -> AppResult<()> {
        self.repo.append(&AuditLogEntry::from(record)).await
    }
}
