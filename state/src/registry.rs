//! Keyed registry of state slices

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use gentleman_core::{
    check_condition, default_sink, to_record, Record, SharedSink, StoreError, StoreResult,
};
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

use crate::slice::StateSlice;
use crate::typed::{SliceKey, TypedSlice};

/// Owns one [`StateSlice`] per key.
///
/// Keys are only ever added. A slice registered under a key stays the one
/// returned for that key for the registry's lifetime; later registrations
/// under the same key are reported to the diagnostic sink and skipped.
pub struct SliceRegistry<K>
where
    K: Eq + Hash,
{
    slices: DashMap<K, Arc<StateSlice>>,
    sink: SharedSink,
}

impl<K> SliceRegistry<K>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Build a registry, registering `entries` in order
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Record)>,
    {
        Self::with_sink(entries, default_sink())
    }

    /// Build a registry reporting diagnostics to `sink`
    pub fn with_sink<I>(entries: I, sink: SharedSink) -> Self
    where
        I: IntoIterator<Item = (K, Record)>,
    {
        let registry = Self {
            slices: DashMap::new(),
            sink,
        };
        for (key, value) in entries {
            registry.create_if_absent(key, value);
        }
        registry
    }

    /// Register a slice for `key` seeded with `value` unless one exists.
    ///
    /// Returns whether a slice was created. An existing key is not an error.
    pub fn create_if_absent(&self, key: K, value: Record) -> bool {
        let label = format!("{:?}", key);
        let created = match self.slices.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::new(StateSlice::new(value)));
                true
            }
        };

        // The shard lock is released here, so the sink may call back in.
        if created {
            debug!(key = %label, "slice registered");
        } else {
            self.sink.duplicate_key(&label);
        }
        created
    }

    /// Register a slice seeded from a typed struct
    pub fn create_typed_if_absent<T: Serialize>(&self, key: K, value: &T) -> StoreResult<bool> {
        Ok(self.create_if_absent(key, to_record(value)?))
    }

    /// The slice registered under `key`
    pub fn get(&self, key: &K) -> StoreResult<Arc<StateSlice>> {
        check_condition(
            || self.slices.get(key).map(|slice| slice.value().clone()),
            || StoreError::entity_not_found(format!("{:?}", key)),
        )
    }

    /// The slice registered under `key`, viewed through its record type
    pub fn get_typed<T>(&self, key: &SliceKey<K, T>) -> StoreResult<TypedSlice<T>> {
        Ok(TypedSlice::new(self.get(key.key())?))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.slices.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Registered keys, in no particular order
    pub fn keys(&self) -> Vec<K> {
        self.slices.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl<K> Default for SliceRegistry<K>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}
