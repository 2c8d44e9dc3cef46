//! Index store for Gentleman State
//!
//! The fixed slice schema an application starts with (a user profile, an
//! organization profile and application settings) and the seed
//! configuration that builds a store from it.

pub mod schema;
pub mod seed;

pub use schema::*;
pub use seed::*;
