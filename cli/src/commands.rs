//! CLI Commands

use gentleman_core::{Record, StoreError, StoreResult};
use gentleman_index::{IndexKey, IndexStore, SeedConfig};
use parking_lot::Mutex;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// Load the seed file, or the built-in defaults when none is given
pub fn load_seed(path: Option<&Path>) -> StoreResult<SeedConfig> {
    match path {
        Some(path) => SeedConfig::from_file(path),
        None => SeedConfig::defaults(),
    }
}

/// Pretty JSON of one slice
pub fn render_slice(store: &IndexStore, key: IndexKey) -> StoreResult<String> {
    let snapshot = store.get(&key)?.snapshot()?;
    pretty(&Value::Object(snapshot))
}

/// Pretty JSON of one slice, or of every registered slice keyed by name
pub fn show(store: &IndexStore, key: Option<IndexKey>) -> StoreResult<String> {
    if let Some(key) = key {
        return render_slice(store, key);
    }

    let mut all = Record::new();
    for key in IndexKey::ALL {
        if store.contains(&key) {
            all.insert(key.to_string(), Value::Object(store.get(&key)?.snapshot()?));
        }
    }
    pretty(&Value::Object(all))
}

/// Pretty JSON of one property
pub fn get(store: &IndexStore, key: IndexKey, property: &str) -> StoreResult<String> {
    let value = store.get(&key)?.get_property(property)?;
    pretty(&value)
}

/// What a `set` produced
#[derive(Debug, Clone)]
pub struct SetOutcome {
    /// Records delivered to a watcher attached before the write, replay first
    pub emissions: Vec<Record>,
    /// Slice value after the write
    pub snapshot: Record,
}

/// Apply a write while watching the slice
pub fn set(
    store: &IndexStore,
    key: IndexKey,
    value_json: &str,
    property: Option<&str>,
    emit: bool,
) -> StoreResult<SetOutcome> {
    let value: Value = serde_json::from_str(value_json)
        .map_err(|e| StoreError::Deserialization(e.to_string()))?;
    let slice = store.get(&key)?;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let subscription = slice
        .watch()?
        .subscribe(move |record| sink.lock().push(record.clone()))?;

    slice.set(value, property, emit)?;
    drop(subscription);

    let emissions = std::mem::take(&mut *seen.lock());
    Ok(SetOutcome {
        emissions,
        snapshot: slice.snapshot()?,
    })
}

fn pretty(value: &Value) -> StoreResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_show_all_lists_every_slice() {
        let store = load_seed(None).unwrap().build();
        let out: Value = serde_json::from_str(&show(&store, None).unwrap()).unwrap();

        assert_eq!(out["user"]["name"], json!("Guest"));
        assert_eq!(out["settings"]["name"], json!("default"));
        assert!(out.get("company").is_some());
    }

    #[test]
    fn test_get_missing_property() {
        let store = load_seed(None).unwrap().build();
        let err = get(&store, IndexKey::User, "email").unwrap_err();
        assert!(matches!(err, StoreError::PropertyNotFound { .. }));
    }

    #[test]
    fn test_set_reports_emissions() {
        let store = load_seed(None).unwrap().build();
        let outcome = set(&store, IndexKey::User, "41", Some("age"), true).unwrap();

        assert_eq!(outcome.emissions.len(), 2);
        assert_eq!(outcome.emissions[1]["age"], json!(41));
        assert_eq!(outcome.snapshot["age"], json!(41));
    }

    #[test]
    fn test_silent_set_reports_only_replay() {
        let store = load_seed(None).unwrap().build();
        let outcome = set(&store, IndexKey::Company, r#"{"address": "Main St"}"#, None, false)
            .unwrap();

        assert_eq!(outcome.emissions.len(), 1);
        assert_eq!(outcome.snapshot["address"], json!("Main St"));
    }

    #[test]
    fn test_set_rejects_bad_json() {
        let store = load_seed(None).unwrap().build();
        let err = set(&store, IndexKey::User, "{not json", None, true).unwrap_err();
        assert!(matches!(err, StoreError::Deserialization(_)));
    }

    #[test]
    fn test_show_missing_slice() {
        let store = SeedConfig::empty().build();
        let err = show(&store, Some(IndexKey::Settings)).unwrap_err();
        assert!(matches!(err, StoreError::EntityNotFound { .. }));
    }
}
