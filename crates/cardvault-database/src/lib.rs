//! # cardvault-database
//!
//! Persistence for Card Vault: the PostgreSQL connection pool, migrations,
//! the repository traits the services depend on, and two implementations
//! of every repository (PostgreSQL via sqlx, and an in-memory store that
//! enforces the same constraints).

pub mod connection;
pub mod error;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use repositories::Repositories;
