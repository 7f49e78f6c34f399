//! Persistence backend selection.

use serde::{Deserialize, Serialize};

/// Which repository implementation the services are wired against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// PostgreSQL through sqlx (the production backend).
    #[default]
    Postgres,
    /// Process-local maps; single node only, lost on restart.
    Memory,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Selected backend.
    #[serde(default)]
    pub backend: StorageBackend,
}
