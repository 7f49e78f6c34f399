//! # cardvault-service
//!
//! Business logic service layer for Card Vault. Every operation resolves
//! the caller's permissions through the access resolver before touching
//! the share store or the ledger.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. [`Services`] wires a full
//! set from one [`Repositories`](cardvault_database::Repositories) bundle.

pub mod audit;
pub mod context;
pub mod favorite;
pub mod ledger;
pub mod registry;
pub mod resource;
pub mod share;

pub use audit::AuditRecorder;
pub use context::RequestContext;
pub use favorite::FavoriteService;
pub use ledger::LedgerService;
pub use registry::Services;
pub use resource::ResourceService;
pub use share::{ShareRecipient, ShareService};
