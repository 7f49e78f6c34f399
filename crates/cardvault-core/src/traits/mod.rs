//! Core traits defined in `cardvault-core` and implemented by other crates.

pub mod audit;

pub use audit::AuditSink;
