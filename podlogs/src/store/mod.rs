//! Content store abstractions and implementations.
//!
//! The [`ContentStore`] is a flat key/blob namespace that holds archived pod
//! snapshots and container logs. It doubles as the reconciler's processing
//! ledger: an artifact counts as captured once its key exists.

mod base;
pub mod memory;
pub mod s3;

pub use base::ContentStore;
