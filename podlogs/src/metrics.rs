use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};

static REGISTER_METRICS: Once = Once::new();

pub const PODLOGS_RECONCILIATIONS_TOTAL: &str = "podlogs_reconciliations_total";
pub const PODLOGS_ARTIFACTS_STORED_TOTAL: &str = "podlogs_artifacts_stored_total";
pub const PODLOGS_PODS_DELETED_TOTAL: &str = "podlogs_pods_deleted_total";
pub const PODLOGS_RECONCILE_DURATION_SECONDS: &str = "podlogs_reconcile_duration_seconds";

pub const OUTCOME: &str = "outcome";
pub const OUTCOME_CAPTURED: &str = "captured";
pub const OUTCOME_SKIPPED: &str = "skipped";
pub const OUTCOME_ERROR: &str = "error";

pub const ARTIFACT: &str = "artifact";
pub const ARTIFACT_POD_SPEC: &str = "pod_spec";
pub const ARTIFACT_CONTAINER_LOGS: &str = "container_logs";

/// Describes the metrics emitted by the reconciler. Safe to call more than once.
pub(crate) fn register_metrics() {
    REGISTER_METRICS.call_once(|| {
        describe_counter!(
            PODLOGS_RECONCILIATIONS_TOTAL,
            Unit::Count,
            "Total number of reconciliations, labelled by outcome"
        );

        describe_counter!(
            PODLOGS_ARTIFACTS_STORED_TOTAL,
            Unit::Count,
            "Total number of pod snapshots and container logs written to the object store"
        );

        describe_counter!(
            PODLOGS_PODS_DELETED_TOTAL,
            Unit::Count,
            "Total number of pods deleted after their logs were archived"
        );

        describe_histogram!(
            PODLOGS_RECONCILE_DURATION_SECONDS,
            Unit::Seconds,
            "Time taken to reconcile a single pod"
        );
    });
}
