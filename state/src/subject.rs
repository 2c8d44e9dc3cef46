//! Broadcast subject with replay of the current value
//!
//! The subject owns the slice's record and the list of observers. Every
//! subscriber gets the current record once on subscribing, then each record
//! installed by an emitting write. Observers run on the caller's thread,
//! after the internal lock is released, over a copy of the observer list
//! taken when the broadcast starts. An observer may therefore subscribe,
//! unsubscribe or write to the same slice from inside its callback.
//!
//! Writes and replays from different threads are serialized by a reentrant
//! delivery guard held from installing a value until its last delivery, so
//! observers see records in write order and the last record delivered is the
//! slice's current value. A nested write made from inside a callback runs to
//! completion before the outer broadcast resumes.

use gentleman_core::{Record, StoreError, StoreResult};
use parking_lot::{Mutex, ReentrantMutex};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Callback registered with a subject. The subject keeps it alive until
/// unsubscribed or closed.
pub type Observer = Arc<dyn Fn(&Record) + Send + Sync>;

struct Inner {
    value: Arc<Record>,
    observers: Vec<(u64, Observer)>,
    closed: bool,
}

pub(crate) struct ReplaySubject {
    inner: Mutex<Inner>,
    delivery: ReentrantMutex<()>,
    next_id: AtomicU64,
}

impl ReplaySubject {
    pub(crate) fn new(initial: Record) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner {
                value: Arc::new(initial),
                observers: Vec::new(),
                closed: false,
            }),
            delivery: ReentrantMutex::new(()),
            next_id: AtomicU64::new(0),
        })
    }

    /// Current record, shared
    pub(crate) fn current(&self) -> StoreResult<Arc<Record>> {
        let inner = self.inner.lock();
        if inner.closed {
            return Err(StoreError::SliceClosed);
        }
        Ok(inner.value.clone())
    }

    /// Install the record produced by `update` as the new value.
    ///
    /// `update` sees the current record and builds a whole replacement; the
    /// stored record is never edited in place. With `emit` the new record is
    /// delivered to every observer before this returns.
    pub(crate) fn replace<F>(&self, update: F, emit: bool) -> StoreResult<()>
    where
        F: FnOnce(&Record) -> StoreResult<Record>,
    {
        let _delivering = self.delivery.lock();
        let delivery = {
            let mut inner = self.inner.lock();
            if inner.closed {
                return Err(StoreError::SliceClosed);
            }
            let next = Arc::new(update(&inner.value)?);
            inner.value = next.clone();
            if emit {
                let observers: Vec<Observer> =
                    inner.observers.iter().map(|(_, o)| o.clone()).collect();
                Some((next, observers))
            } else {
                None
            }
        };

        if let Some((record, observers)) = delivery {
            for observer in observers {
                observer(&record);
            }
        }
        Ok(())
    }

    /// Register an observer built from its own subscription id, then replay
    /// the current record to it.
    pub(crate) fn subscribe_with<F>(self: &Arc<Self>, make: F) -> StoreResult<Subscription>
    where
        F: FnOnce(u64) -> Observer,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let observer = make(id);

        let _delivering = self.delivery.lock();
        let current = {
            let mut inner = self.inner.lock();
            if inner.closed {
                return Err(StoreError::SliceClosed);
            }
            inner.observers.push((id, observer.clone()));
            inner.value.clone()
        };

        observer(&current);

        Ok(Subscription {
            subject: Arc::downgrade(self),
            id,
        })
    }

    pub(crate) fn unsubscribe(&self, id: u64) {
        self.inner.lock().observers.retain(|(oid, _)| *oid != id);
    }

    /// Drop every observer and refuse all further use
    pub(crate) fn close(&self) -> StoreResult<()> {
        let observers = {
            let mut inner = self.inner.lock();
            if inner.closed {
                return Err(StoreError::SliceClosed);
            }
            inner.closed = true;
            std::mem::take(&mut inner.observers)
        };
        // Observers may own channel senders; release them outside the lock.
        drop(observers);
        Ok(())
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    pub(crate) fn observer_count(&self) -> usize {
        self.inner.lock().observers.len()
    }
}

/// Handle to one registered observer.
///
/// Dropping the handle unsubscribes. Unsubscribing never affects other
/// observers of the same slice.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    subject: Weak<ReplaySubject>,
    id: u64,
}

impl Subscription {
    /// Stop receiving records. Calling this more than once is a no-op.
    pub fn unsubscribe(&mut self) {
        if let Some(subject) = self.subject.upgrade() {
            subject.unsubscribe(self.id);
        }
        self.subject = Weak::new();
    }

    /// Whether the observer is still registered with a live slice
    pub fn is_active(&self) -> bool {
        match self.subject.upgrade() {
            Some(subject) => {
                let inner = subject.inner.lock();
                inner.observers.iter().any(|(oid, _)| *oid == self.id)
            }
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn collector(subject: &Arc<ReplaySubject>) -> (Subscription, Arc<Mutex<Vec<Record>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let sub = subject
            .subscribe_with(move |_| -> Observer {
                Arc::new(move |r: &Record| sink.lock().push(r.clone()))
            })
            .unwrap();
        (sub, seen)
    }

    #[test]
    fn test_replay_then_broadcast() {
        let subject = ReplaySubject::new(record(json!({"a": 1})));
        let (_sub, seen) = collector(&subject);

        subject
            .replace(|_| Ok(record(json!({"a": 2}))), true)
            .unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0]["a"], json!(1));
        assert_eq!(seen[1]["a"], json!(2));
    }

    #[test]
    fn test_failed_update_leaves_value() {
        let subject = ReplaySubject::new(record(json!({"a": 1})));
        let err = subject
            .replace(|_| Err(StoreError::NotARecord("number".into())), true)
            .unwrap_err();

        assert!(matches!(err, StoreError::NotARecord(_)));
        assert_eq!(subject.current().unwrap()["a"], json!(1));
    }

    #[test]
    fn test_dropped_subscription_unsubscribes() {
        let subject = ReplaySubject::new(Record::new());
        let (sub, _seen) = collector(&subject);
        assert_eq!(subject.observer_count(), 1);

        drop(sub);
        assert_eq!(subject.observer_count(), 0);
    }

    #[test]
    fn test_observer_can_unsubscribe_itself_mid_broadcast() {
        let subject = ReplaySubject::new(record(json!({"n": 0})));
        let calls = Arc::new(Mutex::new(0usize));

        let weak = Arc::downgrade(&subject);
        let counter = calls.clone();
        let _first = subject
            .subscribe_with(move |id| -> Observer {
                Arc::new(move |r: &Record| {
                    *counter.lock() += 1;
                    if r["n"] == json!(1) {
                        if let Some(subject) = weak.upgrade() {
                            subject.unsubscribe(id);
                        }
                    }
                })
            })
            .unwrap();
        let (_second, seen) = collector(&subject);

        subject.replace(|_| Ok(record(json!({"n": 1}))), true).unwrap();
        subject.replace(|_| Ok(record(json!({"n": 2}))), true).unwrap();

        assert_eq!(*calls.lock(), 2);
        assert_eq!(seen.lock().len(), 3);
    }

    #[test]
    fn test_concurrent_writes_deliver_in_write_order() {
        use std::thread;
        use std::time::Duration;

        let subject = ReplaySubject::new(record(json!({"n": 0})));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = subject
            .subscribe_with(move |_| -> Observer {
                Arc::new(move |r: &Record| {
                    if r["n"] == json!(1) {
                        thread::sleep(Duration::from_millis(100));
                    }
                    sink.lock().push(r["n"].clone());
                })
            })
            .unwrap();

        let writer = {
            let subject = subject.clone();
            thread::spawn(move || {
                subject.replace(|_| Ok(record(json!({"n": 1}))), true).unwrap();
            })
        };
        thread::sleep(Duration::from_millis(20));
        subject.replace(|_| Ok(record(json!({"n": 2}))), true).unwrap();
        writer.join().unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], json!(0));
        assert_eq!(seen.last(), subject.current().unwrap().get("n"));
    }

    #[test]
    fn test_observer_may_write_during_delivery() {
        let subject = ReplaySubject::new(record(json!({"n": 0})));
        let weak = Arc::downgrade(&subject);
        let _writer = subject
            .subscribe_with(move |_| -> Observer {
                Arc::new(move |r: &Record| {
                    if r["n"] == json!(1) {
                        if let Some(subject) = weak.upgrade() {
                            subject
                                .replace(|_| Ok(record(json!({"n": 2}))), true)
                                .unwrap();
                        }
                    }
                })
            })
            .unwrap();
        let (_sub, seen) = collector(&subject);

        subject.replace(|_| Ok(record(json!({"n": 1}))), true).unwrap();

        assert_eq!(subject.current().unwrap()["n"], json!(2));
        assert_eq!(seen.lock().len(), 3);
    }

    #[test]
    fn test_close_is_final() {
        let subject = ReplaySubject::new(Record::new());
        let (sub, _seen) = collector(&subject);

        subject.close().unwrap();
        assert!(!sub.is_active());
        assert!(subject.is_closed());
        assert!(matches!(subject.close(), Err(StoreError::SliceClosed)));
        assert!(matches!(subject.current(), Err(StoreError::SliceClosed)));
    }
}
