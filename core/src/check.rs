//! Shared assert-or-fail helper

use crate::error::StoreError;
use crate::traits::StoreResult;

/// Evaluate `condition`; return its value when met, otherwise the error
/// built by `error`.
///
/// Both closures are lazy so a call site pays for message formatting only
/// on failure.
pub fn check_condition<T, C, E>(condition: C, error: E) -> StoreResult<T>
where
    C: FnOnce() -> Option<T>,
    E: FnOnce() -> StoreError,
{
    match condition() {
        Some(value) => Ok(value),
        None => Err(error()),
    }
}
