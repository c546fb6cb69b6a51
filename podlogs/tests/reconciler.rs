use podlogs::error::ErrorKind;
use podlogs::k8s::{DeleteOutcome, PodPhase};
use podlogs::key::rhai::RhaiKeyDeriver;
use podlogs::reconciler::{Reconciler, ReconcilerConfig, ReconcileOutcome, SkipReason};
use podlogs::selector::NodeSelectorFilter;
use podlogs::store::ContentStore;
use podlogs::store::memory::MemoryStore;
use podlogs::test_utils::k8s::MockPodClient;
use podlogs::test_utils::pod::PodBuilder;
use podlogs::test_utils::store::TestStoreWrapper;
use podlogs_config::shared::DEFAULT_LOG_KEY;
use podlogs_telemetry::tracing::init_test_tracing;

type TestReconciler = Reconciler<MockPodClient, TestStoreWrapper<MemoryStore>, RhaiKeyDeriver>;

fn reconciler(
    config: ReconcilerConfig,
    pods: &MockPodClient,
    store: &TestStoreWrapper<MemoryStore>,
) -> TestReconciler {
    let key_deriver = RhaiKeyDeriver::compile(DEFAULT_LOG_KEY).unwrap();
    Reconciler::new(config, pods.clone(), store.clone(), key_deriver)
}

fn finished_pod(pods: &MockPodClient) {
    pods.insert_pod(
        PodBuilder::new("a", "b")
            .phase("Succeeded")
            .container("c1")
            .container("c2")
            .build(),
    );
    pods.set_logs("a", "b", "c1", b"hello from c1\n");
    pods.set_logs("a", "b", "c2", b"hello from c2\n");
}

fn deleting() -> ReconcilerConfig {
    ReconcilerConfig {
        delete_after_capture: true,
        ..ReconcilerConfig::default()
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn finished_pod_is_archived() {
    init_test_tracing();
    // Arrange
    let pods = MockPodClient::new();
    let store = TestStoreWrapper::wrap(MemoryStore::new());
    finished_pod(&pods);
    let reconciler = reconciler(ReconcilerConfig::default(), &pods, &store);

    // Act
    let outcome = reconciler.reconcile("a", "b").await.unwrap();

    // Assert
    let report = outcome.capture_report().unwrap();
    assert_eq!(report.key_prefix, "a/b");
    assert_eq!(report.stored, vec!["a/b/pod.yaml", "a/b/c1", "a/b/c2"]);
    assert!(report.skipped.is_empty());
    assert_eq!(report.deletion, None);

    let memory = store.inner();
    assert_eq!(memory.get("a/b/c1").await.unwrap(), b"hello from c1\n");
    assert_eq!(memory.get("a/b/c2").await.unwrap(), b"hello from c2\n");

    let snapshot = String::from_utf8(memory.get("a/b/pod.yaml").await.unwrap()).unwrap();
    assert!(snapshot.contains("name: b"));
    assert!(snapshot.contains("namespace: a"));
    assert!(snapshot.contains("phase: Succeeded"));
    assert!(pods.contains_pod("a", "b"));
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_pod_is_archived() {
    init_test_tracing();
    let pods = MockPodClient::new();
    let store = TestStoreWrapper::wrap(MemoryStore::new());
    pods.insert_pod(PodBuilder::new("a", "b").phase("Failed").container("c1").build());
    pods.set_logs("a", "b", "c1", b"panic: boom\n");
    let reconciler = reconciler(ReconcilerConfig::default(), &pods, &store);

    let outcome = reconciler.reconcile("a", "b").await.unwrap();

    assert!(!outcome.is_skipped());
    assert_eq!(store.inner().get("a/b/c1").await.unwrap(), b"panic: boom\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn second_reconciliation_writes_nothing() {
    init_test_tracing();
    // Arrange
    let pods = MockPodClient::new();
    let store = TestStoreWrapper::wrap(MemoryStore::new());
    finished_pod(&pods);
    let reconciler = reconciler(ReconcilerConfig::default(), &pods, &store);
    reconciler.reconcile("a", "b").await.unwrap();

    // Act
    let outcome = reconciler.reconcile("a", "b").await.unwrap();

    // Assert
    let report = outcome.capture_report().unwrap();
    assert!(report.stored.is_empty());
    assert_eq!(report.skipped, vec!["a/b/pod.yaml", "a/b/c1", "a/b/c2"]);
    assert_eq!(store.puts().len(), 3);
    assert_eq!(pods.log_fetches(), vec!["c1", "c2"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn interrupted_capture_resumes_with_missing_artifacts() {
    init_test_tracing();
    // Arrange
    let pods = MockPodClient::new();
    let store = TestStoreWrapper::wrap(MemoryStore::new());
    finished_pod(&pods);
    pods.fail_logs("c2");
    let reconciler = reconciler(ReconcilerConfig::default(), &pods, &store);

    let err = reconciler.reconcile("a", "b").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LogFetchFailed);
    assert_eq!(store.puts(), vec!["a/b/pod.yaml", "a/b/c1"]);

    // Act
    pods.heal_logs("c2");
    let outcome = reconciler.reconcile("a", "b").await.unwrap();

    // Assert
    let report = outcome.capture_report().unwrap();
    assert_eq!(report.stored, vec!["a/b/c2"]);
    assert_eq!(report.skipped, vec!["a/b/pod.yaml", "a/b/c1"]);
    assert_eq!(pods.log_fetches(), vec!["c1", "c2", "c2"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn running_pod_is_skipped() {
    init_test_tracing();
    let pods = MockPodClient::new();
    let store = TestStoreWrapper::wrap(MemoryStore::new());
    pods.insert_pod(PodBuilder::new("a", "b").phase("Running").container("c1").build());
    let reconciler = reconciler(deleting(), &pods, &store);

    let outcome = reconciler.reconcile("a", "b").await.unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Skipped(SkipReason::NotTerminal(PodPhase::Running))
    );
    assert!(store.inner().list().await.unwrap().is_empty());
    assert!(store.has_calls().is_empty());
    assert!(pods.log_fetches().is_empty());
    assert!(pods.deletions().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn pending_pod_is_skipped_without_touching_the_store() {
    init_test_tracing();
    // Arrange
    let pods = MockPodClient::new();
    let store = TestStoreWrapper::wrap(MemoryStore::new());
    pods.insert_pod(
        PodBuilder::new("a", "b")
            .phase("Pending")
            .container("c1")
            .container("c2")
            .build(),
    );
    let reconciler = reconciler(deleting(), &pods, &store);

    // Act
    let outcome = reconciler.reconcile("a", "b").await.unwrap();

    // Assert
    assert_eq!(
        outcome,
        ReconcileOutcome::Skipped(SkipReason::NotTerminal(PodPhase::Pending))
    );
    assert!(store.has_calls().is_empty());
    assert!(store.puts().is_empty());
    assert!(pods.log_fetches().is_empty());
    assert!(pods.deletions().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn pod_without_phase_is_skipped() {
    init_test_tracing();
    let pods = MockPodClient::new();
    let store = TestStoreWrapper::wrap(MemoryStore::new());
    pods.insert_pod(PodBuilder::new("a", "b").container("c1").build());
    let reconciler = reconciler(ReconcilerConfig::default(), &pods, &store);

    let outcome = reconciler.reconcile("a", "b").await.unwrap();

    assert!(outcome.is_skipped());
    assert!(store.has_calls().is_empty());
    assert!(store.puts().is_empty());
    assert!(pods.log_fetches().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_pod_is_skipped() {
    init_test_tracing();
    let pods = MockPodClient::new();
    let store = TestStoreWrapper::wrap(MemoryStore::new());
    let reconciler = reconciler(deleting(), &pods, &store);

    let outcome = reconciler.reconcile("a", "gone").await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Skipped(SkipReason::PodNotFound));
    assert!(pods.deletions().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn pod_fetch_failure_is_an_error() {
    init_test_tracing();
    let pods = MockPodClient::new();
    let store = TestStoreWrapper::wrap(MemoryStore::new());
    finished_pod(&pods);
    pods.fail_get(true);
    let reconciler = reconciler(ReconcilerConfig::default(), &pods, &store);

    let err = reconciler.reconcile("a", "b").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PodFetchFailed);
    assert!(store.puts().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn node_selector_gates_capture() {
    init_test_tracing();
    // Arrange
    let pods = MockPodClient::new();
    let store = TestStoreWrapper::wrap(MemoryStore::new());
    pods.insert_pod(
        PodBuilder::new("a", "east")
            .phase("Succeeded")
            .container("c1")
            .node_selector("zone", "us-east")
            .node_selector("disk", "ssd")
            .build(),
    );
    pods.insert_pod(
        PodBuilder::new("a", "west")
            .phase("Succeeded")
            .container("c1")
            .node_selector("zone", "us-west")
            .build(),
    );
    pods.insert_pod(PodBuilder::new("a", "none").phase("Succeeded").container("c1").build());
    let config = ReconcilerConfig {
        node_selector: NodeSelectorFilter::new(
            [("zone".to_string(), "us-east".to_string())].into(),
        ),
        delete_after_capture: true,
    };
    let reconciler = reconciler(config, &pods, &store);

    // Act
    let east = reconciler.reconcile("a", "east").await.unwrap();
    let west = reconciler.reconcile("a", "west").await.unwrap();
    let none = reconciler.reconcile("a", "none").await.unwrap();

    // Assert
    assert!(east.capture_report().is_some());
    assert_eq!(
        west,
        ReconcileOutcome::Skipped(SkipReason::NodeSelectorMismatch)
    );
    assert_eq!(
        none,
        ReconcileOutcome::Skipped(SkipReason::NodeSelectorMismatch)
    );
    assert_eq!(store.puts(), vec!["a/east/pod.yaml", "a/east/c1"]);
    assert_eq!(pods.deletions(), vec![("a".to_string(), "east".to_string())]);
}

#[tokio::test(flavor = "multi_thread")]
async fn pod_is_deleted_after_every_artifact_is_stored() {
    init_test_tracing();
    let pods = MockPodClient::new();
    let store = TestStoreWrapper::wrap(MemoryStore::new());
    finished_pod(&pods);
    let reconciler = reconciler(deleting(), &pods, &store);

    let outcome = reconciler.reconcile("a", "b").await.unwrap();

    let report = outcome.capture_report().unwrap();
    assert_eq!(report.deletion, Some(DeleteOutcome::Deleted));
    assert_eq!(store.puts().len(), 3);
    assert!(!pods.contains_pod("a", "b"));

    // The deleted pod is gone, so the follow-up event is a no-op.
    let outcome = reconciler.reconcile("a", "b").await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::Skipped(SkipReason::PodNotFound));
}

#[tokio::test(flavor = "multi_thread")]
async fn store_failure_prevents_deletion() {
    init_test_tracing();
    // Arrange
    let pods = MockPodClient::new();
    let store = TestStoreWrapper::wrap(MemoryStore::new());
    finished_pod(&pods);
    store.fail_put("a/b/c2");
    let reconciler = reconciler(deleting(), &pods, &store);

    // Act
    let err = reconciler.reconcile("a", "b").await.unwrap_err();

    // Assert
    assert_eq!(err.kind(), ErrorKind::StoreWriteFailed);
    assert!(pods.deletions().is_empty());
    assert!(pods.contains_pod("a", "b"));

    store.heal_put("a/b/c2");
    let outcome = reconciler.reconcile("a", "b").await.unwrap();
    let report = outcome.capture_report().unwrap();
    assert_eq!(report.stored, vec!["a/b/c2"]);
    assert_eq!(report.deletion, Some(DeleteOutcome::Deleted));
}

#[tokio::test(flavor = "multi_thread")]
async fn store_read_failure_is_an_error() {
    init_test_tracing();
    let pods = MockPodClient::new();
    let store = TestStoreWrapper::wrap(MemoryStore::new());
    finished_pod(&pods);
    store.fail_reads(true);
    let reconciler = reconciler(deleting(), &pods, &store);

    let err = reconciler.reconcile("a", "b").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StoreReadFailed);
    assert!(store.puts().is_empty());
    assert!(pods.log_fetches().is_empty());
    assert!(pods.deletions().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_failure_is_retried_without_rewriting() {
    init_test_tracing();
    let pods = MockPodClient::new();
    let store = TestStoreWrapper::wrap(MemoryStore::new());
    finished_pod(&pods);
    pods.fail_delete(true);
    let reconciler = reconciler(deleting(), &pods, &store);

    let err = reconciler.reconcile("a", "b").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PodDeleteFailed);

    pods.fail_delete(false);
    let outcome = reconciler.reconcile("a", "b").await.unwrap();

    let report = outcome.capture_report().unwrap();
    assert!(report.stored.is_empty());
    assert_eq!(report.deletion, Some(DeleteOutcome::Deleted));
    assert_eq!(store.puts().len(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn key_derivation_failure_is_an_error() {
    init_test_tracing();
    let pods = MockPodClient::new();
    let store = TestStoreWrapper::wrap(MemoryStore::new());
    finished_pod(&pods);
    let key_deriver = RhaiKeyDeriver::compile(r#"metadata.labels["app"] + "/" + name"#).unwrap();
    let reconciler = Reconciler::new(deleting(), pods.clone(), store.clone(), key_deriver);

    let err = reconciler.reconcile("a", "b").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::KeyDerivationFailed);
    assert!(store.puts().is_empty());
    assert!(pods.deletions().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn custom_key_expression_groups_artifacts() {
    init_test_tracing();
    let pods = MockPodClient::new();
    let store = TestStoreWrapper::wrap(MemoryStore::new());
    pods.insert_pod(
        PodBuilder::new("a", "b")
            .phase("Succeeded")
            .label("app", "report")
            .container("c1")
            .build(),
    );
    let key_deriver = RhaiKeyDeriver::compile(r#"metadata.labels["app"] + "/" + name"#).unwrap();
    let reconciler =
        Reconciler::new(ReconcilerConfig::default(), pods.clone(), store.clone(), key_deriver);

    let outcome = reconciler.reconcile("a", "b").await.unwrap();

    assert_eq!(outcome.capture_report().unwrap().key_prefix, "report/b");
    assert_eq!(store.puts(), vec!["report/b/pod.yaml", "report/b/c1"]);
}
