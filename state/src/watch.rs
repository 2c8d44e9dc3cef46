//! Subscribable change streams handed out by a slice

use gentleman_core::{check_condition, Record, StoreError, StoreResult};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::subject::{Observer, ReplaySubject, Subscription};

/// Stream of whole records from one slice
#[derive(Clone)]
pub struct Watch {
    subject: Arc<ReplaySubject>,
}

impl Watch {
    pub(crate) fn new(subject: Arc<ReplaySubject>) -> Self {
        Self { subject }
    }

    /// Register `observer`. It is called once with the current record
    /// before this returns, then with every emitted record.
    ///
    /// The slice owns its observers. An observer that captures an `Arc` of
    /// the same slice forms a reference cycle, and the slice is then only
    /// freed once the returned [`Subscription`] is dropped or the slice is
    /// closed. Capture a [`std::sync::Weak`] and upgrade it in the callback
    /// to avoid this.
    pub fn subscribe<F>(&self, observer: F) -> StoreResult<Subscription>
    where
        F: Fn(&Record) + Send + Sync + 'static,
    {
        self.subject
            .subscribe_with(move |_| -> Observer { Arc::new(observer) })
    }

    /// Feed the stream into an unbounded channel.
    ///
    /// The receiver yields `None` once the slice is closed or the
    /// subscription is dropped.
    pub fn channel(&self) -> StoreResult<(Subscription, mpsc::UnboundedReceiver<Record>)> {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.subscribe(move |record| {
            let _ = tx.send(record.clone());
        })?;
        Ok((subscription, rx))
    }
}

/// Stream of one property's value, derived from a [`Watch`].
///
/// When an emitted record lacks the property the observer receives a single
/// `Err(StoreError::PropertyNotFound)` and the subscription ends.
#[derive(Clone)]
pub struct PropertyWatch {
    subject: Arc<ReplaySubject>,
    property: String,
}

impl PropertyWatch {
    pub(crate) fn new(subject: Arc<ReplaySubject>, property: impl Into<String>) -> Self {
        Self {
            subject,
            property: property.into(),
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn subscribe<F>(&self, observer: F) -> StoreResult<Subscription>
    where
        F: Fn(StoreResult<Value>) + Send + Sync + 'static,
    {
        let property = self.property.clone();
        let weak = Arc::downgrade(&self.subject);

        self.subject.subscribe_with(move |id| -> Observer {
            let terminated = AtomicBool::new(false);
            Arc::new(move |record: &Record| {
                if terminated.load(Ordering::Acquire) {
                    return;
                }
                match lookup(record, &property) {
                    Ok(value) => observer(Ok(value)),
                    Err(err) => {
                        terminated.store(true, Ordering::Release);
                        if let Some(subject) = weak.upgrade() {
                            subject.unsubscribe(id);
                        }
                        observer(Err(err));
                    }
                }
            })
        })
    }

    /// Feed the property stream into an unbounded channel
    pub fn channel(
        &self,
    ) -> StoreResult<(Subscription, mpsc::UnboundedReceiver<StoreResult<Value>>)> {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.subscribe(move |value| {
            let _ = tx.send(value);
        })?;
        Ok((subscription, rx))
    }
}

/// Read one property by membership; a present `null` counts as found
pub(crate) fn lookup(record: &Record, property: &str) -> StoreResult<Value> {
    check_condition(
        || record.get(property).cloned(),
        || StoreError::property_not_found(property),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_counts_null_as_present() {
        let mut record = Record::new();
        record.insert("nickname".into(), Value::Null);

        assert_eq!(lookup(&record, "nickname").unwrap(), Value::Null);
        assert!(matches!(
            lookup(&record, "age"),
            Err(StoreError::PropertyNotFound { property }) if property == "age"
        ));
    }

    #[tokio::test]
    async fn test_channel_receives_replay_and_emissions() {
        let mut initial = Record::new();
        initial.insert("count".into(), json!(0));
        let subject = ReplaySubject::new(initial);
        let watch = Watch::new(subject.clone());

        let (_sub, mut rx) = watch.channel().unwrap();
        subject
            .replace(
                |current| {
                    let mut next = current.clone();
                    next.insert("count".into(), json!(1));
                    Ok(next)
                },
                true,
            )
            .unwrap();

        assert_eq!(rx.recv().await.unwrap()["count"], json!(0));
        assert_eq!(rx.recv().await.unwrap()["count"], json!(1));

        subject.close().unwrap();
        assert!(rx.recv().await.is_none());
    }
}
