//! HTTP service serving archived container logs straight from the object store.

pub mod config;
pub mod routes;
pub mod startup;
