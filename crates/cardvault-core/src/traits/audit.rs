//! Audit sink trait consumed by the services.

use async_trait::async_trait;

use crate::events::AuditRecord;
use crate::result::AppResult;

/// Destination for audit records.
///
/// Recording is fire-and-forget from the caller's point of view: services
/// log and swallow any error returned here so a failing sink never aborts
/// the operation being audited.
#[async_trait]
pub trait AuditSink: Send + Sync + std::fmt::Debug + 'static {
    /// Persist or forward one audit record.
    async fn record(&self, record: AuditRecord) -> AppResult<()>;
}
