//! # cardvault-core
//!
//! Core crate for Card Vault. Contains configuration schemas, typed
//! identifiers, the resource kind vocabulary, audit events, the audit sink
//! trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Card Vault crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
