//! Gentleman State Core Library
//!
//! Core types, errors and configuration shared by the state crates.
//! This crate provides the record model every slice is built on.

pub mod check;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use check::*;
pub use config::*;
pub use error::*;
pub use traits::*;
pub use types::*;
