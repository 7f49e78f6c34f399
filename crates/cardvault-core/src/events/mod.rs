//! Domain events emitted by Card Vault operations.
//!
//! The core emits audit records only; persisting or forwarding them is the
//! job of an [`AuditSink`](crate::traits::AuditSink) implementation.

pub mod audit;

pub use audit::{AuditAction, AuditRecord};
