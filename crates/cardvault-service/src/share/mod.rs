//! Share management: grant, adjust, revoke and list shares.

pub mod service;

pub use service::{ShareRecipient, ShareService};
