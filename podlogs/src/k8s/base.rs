use std::fmt;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;

use crate::error::PodLogsResult;

/// Lifecycle phase of a pod as reported in `status.phase`.
///
/// Unrecognized or missing values map to [`PodPhase::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl PodPhase {
    /// Reads the phase of `pod`.
    pub fn of(pod: &Pod) -> PodPhase {
        pod.status
            .as_ref()
            .and_then(|status| status.phase.as_deref())
            .map(PodPhase::from)
            .unwrap_or(PodPhase::Unknown)
    }

    /// Whether no container of the pod will run again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PodPhase::Succeeded | PodPhase::Failed)
    }
}

impl From<&str> for PodPhase {
    fn from(value: &str) -> Self {
        match value {
            "Pending" => PodPhase::Pending,
            "Running" => PodPhase::Running,
            "Succeeded" => PodPhase::Succeeded,
            "Failed" => PodPhase::Failed,
            _ => PodPhase::Unknown,
        }
    }
}

impl fmt::Display for PodPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Result of a pod deletion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The pod was already gone.
    NotFound,
}

/// Pod operations needed to archive logs.
#[async_trait]
pub trait PodClient: Send + Sync {
    /// Fetches the current state of a pod, `None` if it does not exist.
    async fn get_pod(&self, namespace: &str, name: &str) -> PodLogsResult<Option<Pod>>;

    /// Fetches the full log of one container of a pod as raw bytes.
    async fn get_container_logs(
        &self,
        namespace: &str,
        name: &str,
        container: &str,
    ) -> PodLogsResult<Vec<u8>>;

    /// Requests deletion of a pod.
    async fn delete_pod(&self, namespace: &str, name: &str) -> PodLogsResult<DeleteOutcome>;
}
