//! Tracing and metrics setup shared by the podlogs binaries.

pub mod metrics;
pub mod tracing;

pub use crate::tracing::{LogFlusher, TracingError, init_test_tracing, init_tracing};
