//! Storage key derivation.
//!
//! A [`KeyDeriver`] turns the structural (JSON) representation of a pod into the
//! prefix under which its snapshot and container logs are stored.

mod base;
pub mod rhai;

pub use base::{KeyDeriver, POD_SNAPSHOT_SUFFIX, artifact_key};
