//! Seed configuration for the index store

use gentleman_core::{to_record, Record, SharedSink, StoreConfig, StoreError, StoreResult};
use gentleman_state::SliceRegistry;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::schema::{Company, IndexKey, Settings, User};

/// Registry over the index schema
pub type IndexStore = SliceRegistry<IndexKey>;

/// Shared handle to an index store
pub type SharedIndexStore = Arc<IndexStore>;

/// One initial slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedEntry {
    pub key: IndexKey,
    pub state: Record,
}

impl SeedEntry {
    pub fn new(key: IndexKey, state: Record) -> Self {
        Self { key, state }
    }

    /// Entry seeded from a typed record
    pub fn typed<T: Serialize>(key: IndexKey, state: &T) -> StoreResult<Self> {
        Ok(Self::new(key, to_record(state)?))
    }
}

/// Seed configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Store settings
    #[serde(default)]
    pub store: StoreConfig,
    /// Initial slices, registered in order
    pub entries: Vec<SeedEntry>,
}

impl SeedConfig {
    /// Seed with one default entry per index key
    pub fn defaults() -> StoreResult<Self> {
        Ok(Self {
            store: StoreConfig::default(),
            entries: default_entries()?,
        })
    }

    /// Seed with no entries
    pub fn empty() -> Self {
        Self {
            store: StoreConfig::default(),
            entries: vec![],
        }
    }

    /// Add an entry
    pub fn with_entry(mut self, key: IndexKey, state: Record) -> Self {
        self.entries.push(SeedEntry::new(key, state));
        self
    }

    /// Save to JSON
    pub fn to_json(&self) -> StoreResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Load from JSON
    pub fn from_json(json: &str) -> StoreResult<Self> {
        serde_json::from_str(json).map_err(|e| StoreError::ConfigError(e.to_string()))
    }

    /// Load from a JSON file
    pub fn from_file(path: &Path) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Build the store this seed describes
    pub fn build(&self) -> IndexStore {
        info!(store = %self.store.name, entries = self.entries.len(), "seeding store");
        create_store(self.entries.iter().cloned())
    }

    /// Build the store, reporting diagnostics to `sink`
    pub fn build_with_sink(&self, sink: SharedSink) -> IndexStore {
        info!(store = %self.store.name, entries = self.entries.len(), "seeding store");
        SliceRegistry::with_sink(self.entries.iter().cloned().map(|e| (e.key, e.state)), sink)
    }
}

/// One default entry per index key
pub fn default_entries() -> StoreResult<Vec<SeedEntry>> {
    Ok(vec![
        SeedEntry::typed(IndexKey::User, &User::default())?,
        SeedEntry::typed(IndexKey::Company, &Company::default())?,
        SeedEntry::typed(IndexKey::Settings, &Settings::default())?,
    ])
}

/// Build an index store from seed entries
pub fn create_store<I>(entries: I) -> IndexStore
where
    I: IntoIterator<Item = SeedEntry>,
{
    SliceRegistry::new(entries.into_iter().map(|e| (e.key, e.state)))
}

/// Build the index store with every slice at its default
pub fn create_default_store() -> StoreResult<SharedIndexStore> {
    Ok(Arc::new(create_store(default_entries()?)))
}
