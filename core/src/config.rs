//! Configuration types for Gentleman State

use serde::{Deserialize, Serialize};

/// Store-wide configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store name for logging
    pub name: String,

    /// Logging level, any `tracing` filter directive
    pub log_level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "gentleman-store".to_string(),
            log_level: "info".to_string(),
        }
    }
}
