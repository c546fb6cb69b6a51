//! Pod log capture decisions.
//!
//! The [`Reconciler`] is invoked with a pod identity every time the pod might have
//! changed, possibly several times for the same change. It uses the content
//! store as its only record of progress: before writing any artifact it checks
//! whether the key already exists, so repeated or interrupted runs resume where
//! the previous one stopped and never write an artifact twice.

mod base;
mod config;
mod outcome;

pub use base::Reconciler;
pub use config::ReconcilerConfig;
pub use outcome::{CaptureReport, ReconcileOutcome, SkipReason};
