//! Gift card ledger configuration.

use serde::{Deserialize, Serialize};

/// Limits applied to gift card transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Maximum length of a transaction description, in characters.
    #[serde(default = "default_max_description_length")]
    pub max_description_length: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_description_length: default_max_description_length(),
        }
    }
}

fn default_max_description_length() -> usize {
    255
}
