//! Kubernetes integration.
//!
//! The reconciler only depends on the [`PodClient`] trait. [`http::HttpPodClient`]
//! implements it with the [`kube`] crate using the ambient cluster configuration
//! (in-cluster service account or local kubeconfig), while tests substitute an
//! in-memory client.

mod base;
pub mod http;

pub use base::*;
