use crate::k8s::{DeleteOutcome, PodPhase};

/// Why a reconciliation did nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The pod no longer exists.
    PodNotFound,
    /// The pod has not finished yet.
    NotTerminal(PodPhase),
    /// The pod is not scheduled with the configured node selector.
    NodeSelectorMismatch,
}

/// What a successful capture did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    /// Derived key prefix of every artifact of the pod.
    pub key_prefix: String,
    /// Keys written by this reconciliation, in write order.
    pub stored: Vec<String>,
    /// Keys that already existed and were left untouched.
    pub skipped: Vec<String>,
    /// Result of the deletion request, `None` when deletion is disabled.
    pub deletion: Option<DeleteOutcome>,
}

/// Result of a reconciliation that did not fail.
///
/// Failures are returned as errors and always mean the pod should be retried later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Skipped(SkipReason),
    Captured(CaptureReport),
}

impl ReconcileOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, ReconcileOutcome::Skipped(_))
    }

    pub fn capture_report(&self) -> Option<&CaptureReport> {
        match self {
            ReconcileOutcome::Captured(report) => Some(report),
            ReconcileOutcome::Skipped(_) => None,
        }
    }
}
