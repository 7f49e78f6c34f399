//! Fire-and-forget audit recording.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use cardvault_core::events::{AuditAction, AuditRecord};
use cardvault_core::traits::AuditSink;
use cardvault_core::types::ResourceRef;

use crate::context::RequestContext;

/// Hands audit records to the configured sink and swallows its failures.
#[derive(Debug, Clone)]
pub struct AuditRecorder {
    sink: Arc<dyn AuditSink>,
}

impl AuditRecorder {
    /// Creates a recorder writing to `sink`.
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Record `action` on `resource` by the context's user.
    ///
    /// Never fails; a sink error is logged and dropped.
    pub async fn record<S: Serialize>(
        &self,
        ctx: &RequestContext,
        action: AuditAction,
        resource: ResourceRef,
        snapshot: &S,
    ) {
        let record = AuditRecord::new(action, resource, ctx.user_id, snapshot);
        if let Err(e) = self.sink.record(record).await {
            warn!(
                request_id = %ctx.request_id,
                user_id = %ctx.user_id,
                action = %action,
                resource = %resource,
                error = %e,
                "Failed to record audit event"
            );
        }
    }
}
