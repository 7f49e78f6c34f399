use async_trait::async_trait;

use cardvault_core::result::AppResult;
use cardvault_core::types::ResourceRef;
use cardvault_entity::audit::AuditLogEntry;

use super::MemoryStore;
use crate::repositories::AuditLogRepository;

#[async_trait]
impl AuditLogRepository for MemoryStore {
    async fn append(&self, entry: &AuditLogEntry) -> AppResult<()> {
        self.state.audit_log.write().await.push(entry.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<AuditLogEntry>> {
        let log = self.state.audit_log.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(log.iter().rev().take(limit).cloned().collect())
    }

    async fn list_for_resource(&self, resource: ResourceRef) -> AppResult<Vec<AuditLogEntry>> {
        let log = self.state.audit_log.read().await;
        Ok(log
            .iter()
            .filter(|e| e.resource_type == resource.kind() && e.resource_id == resource.uuid())
            .cloned()
            .collect())
    }
}
