//! Error types for Gentleman State

use thiserror::Error;

/// Main error type for Gentleman State
#[derive(Error, Debug)]
pub enum StoreError {
    // ============ Slice Errors ============
    #[error("Selected property \"{property}\" not found in state! Check if the key is correct and exists.")]
    PropertyNotFound { property: String },

    #[error("Slice is closed")]
    SliceClosed,

    #[error("Value is not a record: {0}")]
    NotARecord(String),

    // ============ Registry Errors ============
    #[error("Entity {key} not found! Check if the key is correct and exists.")]
    EntityNotFound { key: String },

    // ============ Serialization Errors ============
    #[error("Record serialization failed: {0}")]
    Serialization(String),

    #[error("Record deserialization failed: {0}")]
    Deserialization(String),

    // ============ Configuration Errors ============
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(String),

    // ============ General Errors ============
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    pub fn property_not_found(property: impl Into<String>) -> Self {
        StoreError::PropertyNotFound {
            property: property.into(),
        }
    }

    pub fn entity_not_found(key: impl Into<String>) -> Self {
        StoreError::EntityNotFound { key: key.into() }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
