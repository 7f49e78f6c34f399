//! Repository traits and their PostgreSQL implementations.
//!
//! Services depend only on the traits. [`Repositories`] bundles one
//! implementation of each, selected by the configured storage backend.

pub mod audit;
pub mod favorite;
pub mod ledger;
pub mod resource;
pub mod share;
pub mod user;

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use cardvault_core::config::{AppConfig, StorageBackend};
use cardvault_core::result::AppResult;

pub use audit::{AuditLogRepository, PgAuditLogRepository, RepositoryAuditSink};
pub use favorite::{FavoriteRepository, PgFavoriteRepository};
pub use ledger::{LedgerRepository, LedgerUnitOfWork, PgLedgerRepository};
pub use resource::{PgResourceRepository, ResourceRepository};
pub use share::{PgShareRepository, ShareRepository};
pub use user::{PgUserRepository, UserRepository};

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;

/// One implementation of every repository.
#[derive(Debug, Clone)]
pub struct Repositories {
    /// User directory.
    pub users: Arc<dyn UserRepository>,
    /// Cards, vouchers and gift cards.
    pub resources: Arc<dyn ResourceRepository>,
    /// Shares of all three kinds.
    pub shares: Arc<dyn ShareRepository>,
    /// Gift card ledger.
    pub ledger: Arc<dyn LedgerRepository>,
    /// Favorite markers.
    pub favorites: Arc<dyn FavoriteRepository>,
    /// Audit log.
    pub audit_log: Arc<dyn AuditLogRepository>,
}

impl Repositories {
    /// Build repositories for the configured storage backend, connecting to
    /// PostgreSQL when that backend is selected.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        match config.storage.backend {
            StorageBackend::Postgres => {
                info!("Initializing PostgreSQL repositories");
                let db = DatabasePool::connect(&config.database).await?;
                Ok(Self::postgres(db.into_pool()))
            }
            StorageBackend::Memory => {
                info!("Initializing in-memory repositories");
                Ok(Self::memory())
            }
        }
    }

    /// Repositories backed by PostgreSQL.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            resources: Arc::new(PgResourceRepository::new(pool.clone())),
            shares: Arc::new(PgShareRepository::new(pool.clone())),
            ledger: Arc::new(PgLedgerRepository::new(pool.clone())),
            favorites: Arc::new(PgFavoriteRepository::new(pool.clone())),
            audit_log: Arc::new(PgAuditLogRepository::new(pool)),
        }
    }

    /// Repositories backed by a fresh in-memory store.
    pub fn memory() -> Self {
        Self::from_store(MemoryStore::new())
    }

    /// Repositories sharing an existing in-memory store.
    pub fn from_store(store: MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            resources: Arc::new(store.clone()),
            shares: Arc::new(store.clone()),
            ledger: Arc::new(store.clone()),
            favorites: Arc::new(store.clone()),
            audit_log: Arc::new(store),
        }
    }

    /// An audit sink writing to this bundle's audit log.
    pub fn audit_sink(&self) -> RepositoryAuditSink {
        RepositoryAuditSink::new(Arc::clone(&self.audit_log))
    }
}
