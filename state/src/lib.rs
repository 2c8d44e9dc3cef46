//! Gentleman State Slices
//!
//! Provides observable state slices and the registry that owns them.
//! Each slice holds a record = { property → value } that can be read
//! synchronously or watched for changes.

pub mod registry;
pub mod slice;
pub mod subject;
pub mod typed;
pub mod watch;

pub use registry::*;
pub use slice::*;
pub use subject::{Observer, Subscription};
pub use typed::*;
pub use watch::*;
