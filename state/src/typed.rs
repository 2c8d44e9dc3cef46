//! Typed accessors over the dynamic record model
//!
//! A [`SliceKey`] ties a registry key to the struct its slice holds, so a
//! lookup through it hands back a [`TypedSlice`] that reads and writes that
//! struct directly.

use gentleman_core::{to_record, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::slice::StateSlice;
use crate::watch::{PropertyWatch, Watch};

/// Registry key paired with the record type stored under it
pub struct SliceKey<K, T> {
    key: K,
    _record: PhantomData<fn() -> T>,
}

impl<K, T> SliceKey<K, T> {
    pub const fn new(key: K) -> Self {
        Self {
            key,
            _record: PhantomData,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }
}

impl<K: Clone, T> Clone for SliceKey<K, T> {
    fn clone(&self) -> Self {
        Self::new(self.key.clone())
    }
}

impl<K: Copy, T> Copy for SliceKey<K, T> {}

impl<K: std::fmt::Debug, T> std::fmt::Debug for SliceKey<K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SliceKey").field(&self.key).finish()
    }
}

/// A slice handle that converts through `T`
pub struct TypedSlice<T> {
    slice: Arc<StateSlice>,
    _record: PhantomData<fn() -> T>,
}

impl<T> TypedSlice<T> {
    pub(crate) fn new(slice: Arc<StateSlice>) -> Self {
        Self {
            slice,
            _record: PhantomData,
        }
    }

    /// The untyped slice behind this handle
    pub fn slice(&self) -> &Arc<StateSlice> {
        &self.slice
    }

    pub fn watch(&self) -> StoreResult<Watch> {
        self.slice.watch()
    }

    pub fn watch_property(&self, name: &str) -> StoreResult<PropertyWatch> {
        self.slice.watch_property(name)
    }
}

impl<T: DeserializeOwned> TypedSlice<T> {
    pub fn snapshot(&self) -> StoreResult<T> {
        self.slice.snapshot_as()
    }
}

impl<T: Serialize> TypedSlice<T> {
    /// Merge every field of `value` into the slice and notify
    pub fn update(&self, value: &T) -> StoreResult<()> {
        self.slice.patch(to_record(value)?)
    }
}

impl<T> Clone for TypedSlice<T> {
    fn clone(&self) -> Self {
        Self::new(self.slice.clone())
    }
}
