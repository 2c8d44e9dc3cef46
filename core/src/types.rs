//! Core types for Gentleman State
//!
//! A slice holds a [`Record`]: a flat mapping from property name to value.
//! Typed structs cross into and out of that representation through serde.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;
use crate::traits::StoreResult;

/// Property-name to value mapping held by a slice
pub type Record = serde_json::Map<String, Value>;

/// Convert any serializable struct into a record
pub fn to_record<T: Serialize>(value: &T) -> StoreResult<Record> {
    match serde_json::to_value(value) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(other) => Err(StoreError::NotARecord(describe(&other).to_string())),
        Err(e) => Err(StoreError::Serialization(e.to_string())),
    }
}

/// Read a record back as a typed struct
pub fn from_record<T: DeserializeOwned>(record: &Record) -> StoreResult<T> {
    serde_json::from_value(Value::Object(record.clone()))
        .map_err(|e| StoreError::Deserialization(e.to_string()))
}

/// Short name of a JSON value's kind, used in error messages
pub fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
