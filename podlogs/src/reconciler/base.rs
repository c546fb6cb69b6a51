use std::time::Instant;

use k8s_openapi::api::core::v1::Pod;
use metrics::{counter, histogram};
use tracing::{debug, info, warn};

use crate::error::PodLogsResult;
use crate::k8s::{DeleteOutcome, PodClient, PodPhase};
use crate::key::{KeyDeriver, POD_SNAPSHOT_SUFFIX, artifact_key};
use crate::metrics::{
    ARTIFACT, ARTIFACT_CONTAINER_LOGS, ARTIFACT_POD_SPEC, OUTCOME, OUTCOME_CAPTURED,
    OUTCOME_ERROR, OUTCOME_SKIPPED, PODLOGS_ARTIFACTS_STORED_TOTAL, PODLOGS_PODS_DELETED_TOTAL,
    PODLOGS_RECONCILE_DURATION_SECONDS, PODLOGS_RECONCILIATIONS_TOTAL, register_metrics,
};
use crate::reconciler::{CaptureReport, ReconcileOutcome, ReconcilerConfig, SkipReason};
use crate::store::ContentStore;

/// Archives the snapshot and container logs of terminated pods.
///
/// All I/O happens inside [`Reconciler::reconcile`]; dropping its future cancels
/// whatever call is in flight. No retries happen here: every error is handed back
/// to the caller, which decides when to try again.
pub struct Reconciler<C, S, K> {
    config: ReconcilerConfig,
    pods: C,
    store: S,
    key_deriver: K,
}

impl<C, S, K> Reconciler<C, S, K>
where
    C: PodClient,
    S: ContentStore,
    K: KeyDeriver,
{
    pub fn new(config: ReconcilerConfig, pods: C, store: S, key_deriver: K) -> Self {
        register_metrics();

        Self {
            config,
            pods,
            store,
            key_deriver,
        }
    }

    /// Reconciles the pod `namespace/name`.
    ///
    /// Returns [`ReconcileOutcome::Skipped`] when there is nothing to do yet (or anymore),
    /// [`ReconcileOutcome::Captured`] once every artifact exists in the store, and an
    /// error when any call failed and the pod must be reconciled again.
    pub async fn reconcile(&self, namespace: &str, name: &str) -> PodLogsResult<ReconcileOutcome> {
        let start = Instant::now();
        let result = self.reconcile_pod(namespace, name).await;
        histogram!(PODLOGS_RECONCILE_DURATION_SECONDS).record(start.elapsed().as_secs_f64());

        match &result {
            Ok(ReconcileOutcome::Captured(report)) => {
                counter!(PODLOGS_RECONCILIATIONS_TOTAL, OUTCOME => OUTCOME_CAPTURED).increment(1);
                info!(
                    namespace,
                    name,
                    key_prefix = report.key_prefix,
                    stored = report.stored.len(),
                    skipped = report.skipped.len(),
                    "pod logs archived"
                );
            }
            Ok(ReconcileOutcome::Skipped(reason)) => {
                counter!(PODLOGS_RECONCILIATIONS_TOTAL, OUTCOME => OUTCOME_SKIPPED).increment(1);
                debug!(namespace, name, ?reason, "pod skipped");
            }
            Err(err) => {
                counter!(PODLOGS_RECONCILIATIONS_TOTAL, OUTCOME => OUTCOME_ERROR).increment(1);
                warn!(namespace, name, error = %err, "pod reconciliation failed");
            }
        }

        result
    }

    async fn reconcile_pod(&self, namespace: &str, name: &str) -> PodLogsResult<ReconcileOutcome> {
        let Some(pod) = self.pods.get_pod(namespace, name).await? else {
            return Ok(ReconcileOutcome::Skipped(SkipReason::PodNotFound));
        };

        let phase = PodPhase::of(&pod);
        debug!(namespace, name, %phase, "pod phase");
        if !phase.is_terminal() {
            return Ok(ReconcileOutcome::Skipped(SkipReason::NotTerminal(phase)));
        }

        let node_selector = pod.spec.as_ref().and_then(|spec| spec.node_selector.as_ref());
        if !self.config.node_selector.matches(node_selector) {
            return Ok(ReconcileOutcome::Skipped(SkipReason::NodeSelectorMismatch));
        }

        let key_prefix = self.key_deriver.derive(&serde_json::to_value(&pod)?)?;
        let mut report = CaptureReport {
            key_prefix,
            stored: Vec::new(),
            skipped: Vec::new(),
            deletion: None,
        };

        self.store_snapshot(&pod, &mut report).await?;
        self.store_container_logs(&pod, namespace, name, &mut report)
            .await?;

        if self.config.delete_after_capture {
            let deletion = self.pods.delete_pod(namespace, name).await?;
            if deletion == DeleteOutcome::Deleted {
                counter!(PODLOGS_PODS_DELETED_TOTAL).increment(1);
                info!(namespace, name, "pod deleted");
            }
            report.deletion = Some(deletion);
        }

        Ok(ReconcileOutcome::Captured(report))
    }

    async fn store_snapshot(&self, pod: &Pod, report: &mut CaptureReport) -> PodLogsResult<()> {
        let key = artifact_key(&report.key_prefix, POD_SNAPSHOT_SUFFIX);
        if self.store.has(&key).await? {
            report.skipped.push(key);
            return Ok(());
        }

        let snapshot = serde_yaml::to_string(pod)?;
        self.store.put(&key, snapshot.into_bytes()).await?;
        counter!(PODLOGS_ARTIFACTS_STORED_TOTAL, ARTIFACT => ARTIFACT_POD_SPEC).increment(1);
        info!(key, "pod snapshot saved");
        report.stored.push(key);

        Ok(())
    }

    /// Stores the log of every declared container that is not archived yet.
    ///
    /// Stops at the first failure; the next attempt re-checks each container and
    /// only fetches the ones still missing.
    async fn store_container_logs(
        &self,
        pod: &Pod,
        namespace: &str,
        name: &str,
        report: &mut CaptureReport,
    ) -> PodLogsResult<()> {
        let containers = pod
            .spec
            .as_ref()
            .map(|spec| spec.containers.as_slice())
            .unwrap_or_default();

        for container in containers {
            let key = artifact_key(&report.key_prefix, &container.name);
            if self.store.has(&key).await? {
                debug!(key, "container logs already saved");
                report.skipped.push(key);
                continue;
            }

            let logs = self
                .pods
                .get_container_logs(namespace, name, &container.name)
                .await?;
            self.store.put(&key, logs).await?;
            counter!(PODLOGS_ARTIFACTS_STORED_TOTAL, ARTIFACT => ARTIFACT_CONTAINER_LOGS)
                .increment(1);
            info!(key, "container logs saved");
            report.stored.push(key);
        }

        Ok(())
    }
}
