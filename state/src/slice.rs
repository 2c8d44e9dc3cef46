//! A single observable state slice

use gentleman_core::{describe, from_record, to_record, Record, StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::subject::ReplaySubject;
use crate::watch::{lookup, PropertyWatch, Watch};

/// One named unit of state holding a record.
///
/// Readers only ever get copies of the record, so the notification path
/// cannot be bypassed. Every write swaps the whole record. Once closed, every
/// operation fails with [`StoreError::SliceClosed`].
pub struct StateSlice {
    subject: Arc<ReplaySubject>,
}

impl StateSlice {
    pub fn new(initial: Record) -> Self {
        Self {
            subject: ReplaySubject::new(initial),
        }
    }

    /// Build a slice seeded from a typed struct
    pub fn from_value<T: Serialize>(initial: &T) -> StoreResult<Self> {
        Ok(Self::new(to_record(initial)?))
    }

    /// Shallow copy of the current record
    pub fn snapshot(&self) -> StoreResult<Record> {
        Ok(self.subject.current()?.as_ref().clone())
    }

    /// Current record read back as a typed struct
    pub fn snapshot_as<T: DeserializeOwned>(&self) -> StoreResult<T> {
        from_record(self.subject.current()?.as_ref())
    }

    /// Current value of one property
    pub fn get_property(&self, name: &str) -> StoreResult<Value> {
        lookup(self.subject.current()?.as_ref(), name)
    }

    pub fn watch(&self) -> StoreResult<Watch> {
        self.ensure_open()?;
        Ok(Watch::new(self.subject.clone()))
    }

    pub fn watch_property(&self, name: &str) -> StoreResult<PropertyWatch> {
        self.ensure_open()?;
        Ok(PropertyWatch::new(self.subject.clone(), name))
    }

    /// Write to the slice.
    ///
    /// When `property` names a property already in the record, only that
    /// property is replaced with `value`. Otherwise `value` must be an object
    /// and is shallow-merged over the record, its keys winning; `property` is
    /// then ignored. With `emit` the new record is delivered to all current
    /// subscribers before this returns.
    pub fn set(&self, value: Value, property: Option<&str>, emit: bool) -> StoreResult<()> {
        self.subject
            .replace(|current| apply_write(current, value, property), emit)?;
        debug!(property = property.unwrap_or(""), emit, "slice updated");
        Ok(())
    }

    /// Replace one property and notify
    pub fn set_property(&self, name: &str, value: impl Into<Value>) -> StoreResult<()> {
        self.set(value.into(), Some(name), true)
    }

    /// Merge a partial record and notify
    pub fn patch(&self, partial: Record) -> StoreResult<()> {
        self.set(Value::Object(partial), None, true)
    }

    /// Replace the record with an empty one. Subscribers are not notified.
    pub fn reset(&self) -> StoreResult<()> {
        self.subject.replace(|_| Ok(Record::new()), false)?;
        debug!("slice reset");
        Ok(())
    }

    /// Unsubscribe every observer and retire the slice for good
    pub fn close(&self) -> StoreResult<()> {
        self.subject.close()?;
        debug!("slice closed");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.subject.is_closed()
    }

    /// Number of currently registered observers
    pub fn subscriber_count(&self) -> usize {
        self.subject.observer_count()
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.subject.is_closed() {
            return Err(StoreError::SliceClosed);
        }
        Ok(())
    }
}

impl fmt::Debug for StateSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("StateSlice");
        match self.subject.current() {
            Ok(record) => s.field("value", &record),
            Err(_) => s.field("value", &"<closed>"),
        };
        s.field("subscribers", &self.subject.observer_count()).finish()
    }
}

/// Build the record that results from writing `value` over `current`.
///
/// Property-targeted replacement applies only when `property` is supplied,
/// non-empty and already present; every other call merges.
fn apply_write(current: &Record, value: Value, property: Option<&str>) -> StoreResult<Record> {
    let mut next = current.clone();

    match property {
        Some(name) if !name.is_empty() && current.contains_key(name) => {
            next.insert(name.to_string(), value);
        }
        _ => match value {
            Value::Object(partial) => next.extend(partial),
            other => return Err(StoreError::NotARecord(describe(&other).to_string())),
        },
    }

    Ok(next)
}
