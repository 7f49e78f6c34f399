//! Audit trail emission.

pub mod recorder;

pub use recorder::AuditRecorder;
