use podlogs::key::rhai::RhaiKeyDeriver;
use podlogs::reconciler::{Reconciler, ReconcilerConfig};
use podlogs::test_utils::k8s::MockPodClient;
use podlogs::test_utils::pod::PodBuilder;
use podlogs_config::shared::DEFAULT_LOG_KEY;
use podlogs_telemetry::tracing::init_test_tracing;
use reqwest::StatusCode;

use crate::support::test_app::spawn_test_app;

mod support;

#[tokio::test(flavor = "multi_thread")]
async fn reconciled_pod_logs_are_served() {
    init_test_tracing();
    // Arrange
    let app = spawn_test_app().await;
    let pods = MockPodClient::new();
    pods.insert_pod(
        PodBuilder::new("a", "b")
            .phase("Succeeded")
            .container("c1")
            .container("c2")
            .build(),
    );
    pods.set_logs("a", "b", "c1", b"c1 started\nc1 done\n");
    pods.set_logs("a", "b", "c2", b"c2 started\n");
    let reconciler = Reconciler::new(
        ReconcilerConfig::default(),
        pods.clone(),
        app.store.clone(),
        RhaiKeyDeriver::compile(DEFAULT_LOG_KEY).unwrap(),
    );

    // Act
    reconciler.reconcile("a", "b").await.unwrap();
    let c1 = app.read_logs("a", "b", "c1").await;
    let c2 = app.read_logs("a", "b", "c2").await;
    let c3 = app.read_logs("a", "b", "c3").await;

    // Assert
    assert_eq!(c1.status(), StatusCode::OK);
    assert_eq!(c1.bytes().await.unwrap().as_ref(), b"c1 started\nc1 done\n");
    assert_eq!(c2.status(), StatusCode::OK);
    assert_eq!(c2.bytes().await.unwrap().as_ref(), b"c2 started\n");
    assert_eq!(c3.status(), StatusCode::NOT_FOUND);
}
