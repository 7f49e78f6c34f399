//! Per-resource permission resolution from ownership and shares.

pub mod permissions;
pub mod resolver;

pub use permissions::{Capability, Permissions, resolve};
pub use resolver::AccessResolver;
