//! Core type definitions used across the Card Vault workspace.

pub mod id;
pub mod resource;

pub use id::*;
pub use resource::{ResourceKind, ResourceRef};
