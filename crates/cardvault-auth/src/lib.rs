//! # cardvault-auth
//!
//! Resource authorization for Card Vault.
//!
//! ## Modules
//!
//! - `acl`: the pure permission model and the resolver that feeds it
//!   ownership and share facts loaded from storage

pub mod acl;

pub use acl::{AccessResolver, Capability, Permissions};
