//! Test doubles for the reconciler's collaborators.

pub mod k8s;
pub mod pod;
pub mod store;
