use crate::error::PodLogsResult;

/// Key suffix of the pod snapshot stored next to the container logs.
pub const POD_SNAPSHOT_SUFFIX: &str = "pod.yaml";

/// Derives a storage key prefix from a pod.
///
/// Implementations must be pure: the same input always yields the same prefix,
/// otherwise a retried reconciliation would not find what an earlier attempt stored.
pub trait KeyDeriver: Send + Sync {
    fn derive(&self, pod: &serde_json::Value) -> PodLogsResult<String>;
}

/// Joins a derived prefix and an artifact suffix into a storage key.
pub fn artifact_key(prefix: &str, suffix: &str) -> String {
    format!("{prefix}/{suffix}")
}
