//! Core traits defining Gentleman State interfaces

use std::sync::Arc;
use tracing::info;

/// Result type for Gentleman State operations
pub type StoreResult<T> = Result<T, crate::error::StoreError>;

/// Receives non-fatal diagnostics raised by a registry.
///
/// Implementations must not panic; the registry continues normally after
/// every call.
pub trait DiagnosticSink: Send + Sync {
    /// A registration was skipped because `key` already has a slice
    fn duplicate_key(&self, key: &str);
}

/// Default sink, forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn duplicate_key(&self, key: &str) {
        info!(key, "the key already exists as an entity so it will be ignored");
    }
}

/// Shared diagnostic sink handle
pub type SharedSink = Arc<dyn DiagnosticSink>;

/// Create the default shared sink
pub fn default_sink() -> SharedSink {
    Arc::new(TracingSink)
}
