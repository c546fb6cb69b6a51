//! Archives the snapshot and container logs of terminated Kubernetes pods into
//! an object store.
//!
//! The [`reconciler::Reconciler`] decides per pod what still needs capturing,
//! [`key::KeyDeriver`] names the artifacts and [`store::ContentStore`] holds them.

pub mod error;
pub mod k8s;
pub mod key;
mod macros;
pub mod metrics;
pub mod reconciler;
pub mod selector;
pub mod store;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
