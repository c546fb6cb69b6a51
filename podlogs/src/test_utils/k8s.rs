use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;

use crate::bail;
use crate::error::{ErrorKind, PodLogsResult};
use crate::k8s::{DeleteOutcome, PodClient};

type PodId = (String, String);

#[derive(Debug, Default)]
struct Inner {
    pods: HashMap<PodId, Pod>,
    logs: HashMap<(String, String, String), Vec<u8>>,
    failing_log_containers: HashSet<String>,
    fail_get: bool,
    fail_delete: bool,
    log_fetches: Vec<String>,
    deletions: Vec<PodId>,
}

/// In-memory [`PodClient`] with call recording and fault injection.
///
/// Clones share state, so a test can keep a handle while the reconciler owns another.
#[derive(Debug, Clone, Default)]
pub struct MockPodClient {
    inner: Arc<Mutex<Inner>>,
}

impl MockPodClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a pod, keyed by its metadata namespace and name.
    pub fn insert_pod(&self, pod: Pod) {
        let id = (
            pod.metadata.namespace.clone().unwrap_or_default(),
            pod.metadata.name.clone().unwrap_or_default(),
        );
        self.inner.lock().unwrap().pods.insert(id, pod);
    }

    pub fn set_logs(&self, namespace: &str, name: &str, container: &str, logs: &[u8]) {
        self.inner.lock().unwrap().logs.insert(
            (namespace.to_string(), name.to_string(), container.to_string()),
            logs.to_vec(),
        );
    }

    /// Makes log fetches of `container` fail until [`MockPodClient::heal_logs`] is called.
    pub fn fail_logs(&self, container: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_log_containers
            .insert(container.to_string());
    }

    pub fn heal_logs(&self, container: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_log_containers
            .remove(container);
    }

    pub fn fail_get(&self, fail: bool) {
        self.inner.lock().unwrap().fail_get = fail;
    }

    pub fn fail_delete(&self, fail: bool) {
        self.inner.lock().unwrap().fail_delete = fail;
    }

    pub fn contains_pod(&self, namespace: &str, name: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .pods
            .contains_key(&(namespace.to_string(), name.to_string()))
    }

    /// Containers whose logs were requested, in call order.
    pub fn log_fetches(&self) -> Vec<String> {
        self.inner.lock().unwrap().log_fetches.clone()
    }

    /// Pods a deletion was requested for, in call order.
    pub fn deletions(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().deletions.clone()
    }
}

#[async_trait]
impl PodClient for MockPodClient {
    async fn get_pod(&self, namespace: &str, name: &str) -> PodLogsResult<Option<Pod>> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_get {
            bail!(ErrorKind::PodFetchFailed, "injected pod fetch failure");
        }

        Ok(inner
            .pods
            .get(&(namespace.to_string(), name.to_string()))
            .cloned())
    }

    async fn get_container_logs(
        &self,
        namespace: &str,
        name: &str,
        container: &str,
    ) -> PodLogsResult<Vec<u8>> {
        let mut inner = self.inner.lock().unwrap();
        inner.log_fetches.push(container.to_string());
        if inner.failing_log_containers.contains(container) {
            bail!(
                ErrorKind::LogFetchFailed,
                "injected log fetch failure",
                container
            );
        }

        Ok(inner
            .logs
            .get(&(namespace.to_string(), name.to_string(), container.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_pod(&self, namespace: &str, name: &str) -> PodLogsResult<DeleteOutcome> {
        let mut inner = self.inner.lock().unwrap();
        let id = (namespace.to_string(), name.to_string());
        inner.deletions.push(id.clone());
        if inner.fail_delete {
            bail!(ErrorKind::PodDeleteFailed, "injected pod delete failure");
        }

        match inner.pods.remove(&id) {
            Some(_) => Ok(DeleteOutcome::Deleted),
            None => Ok(DeleteOutcome::NotFound),
        }
    }
}
