use async_trait::async_trait;
use futures::AsyncReadExt;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{DeleteParams, LogParams};
use kube::{Api, Client};
use tracing::debug;

use crate::error::{ErrorKind, PodLogsResult};
use crate::k8s::{DeleteOutcome, PodClient};
use crate::podlogs_error;

/// [`PodClient`] talking to the Kubernetes API server.
#[derive(Clone)]
pub struct HttpPodClient {
    client: Client,
}

impl HttpPodClient {
    /// Connects using the in-cluster configuration or the local kubeconfig.
    pub async fn new() -> PodLogsResult<HttpPodClient> {
        let client = Client::try_default().await.map_err(|err| {
            podlogs_error!(
                ErrorKind::ConfigError,
                "failed to create kubernetes client",
                err
            )
        })?;

        Ok(HttpPodClient { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl PodClient for HttpPodClient {
    async fn get_pod(&self, namespace: &str, name: &str) -> PodLogsResult<Option<Pod>> {
        self.pods(namespace)
            .get_opt(name)
            .await
            .map_err(|err| podlogs_error!(ErrorKind::PodFetchFailed, "failed to fetch pod", err))
    }

    async fn get_container_logs(
        &self,
        namespace: &str,
        name: &str,
        container: &str,
    ) -> PodLogsResult<Vec<u8>> {
        let params = LogParams {
            container: Some(container.to_string()),
            ..LogParams::default()
        };

        let stream = self
            .pods(namespace)
            .log_stream(name, &params)
            .await
            .map_err(|err| podlogs_error!(ErrorKind::LogFetchFailed, "failed to request logs", err))?;

        let mut reader = Box::pin(stream);
        let mut logs = Vec::new();
        reader
            .read_to_end(&mut logs)
            .await
            .map_err(|err| podlogs_error!(ErrorKind::LogFetchFailed, "failed to read logs", err))?;

        debug!(namespace, name, container, size = logs.len(), "fetched container logs");

        Ok(logs)
    }

    async fn delete_pod(&self, namespace: &str, name: &str) -> PodLogsResult<DeleteOutcome> {
        match self
            .pods(namespace)
            .delete(name, &DeleteParams::default())
            .await
        {
            Ok(_) => Ok(DeleteOutcome::Deleted),
            Err(kube::Error::Api(response)) if response.code == 404 => {
                Ok(DeleteOutcome::NotFound)
            }
            Err(err) => Err(podlogs_error!(
                ErrorKind::PodDeleteFailed,
                "failed to delete pod",
                err
            )),
        }
    }
}
