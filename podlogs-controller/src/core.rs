use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use k8s_openapi::api::core::v1::Pod;
use kube::runtime::controller::{Action, Controller};
use kube::runtime::watcher;
use kube::{Api, ResourceExt};
use podlogs::error::PodLogsError;
use podlogs::k8s::http::HttpPodClient;
use podlogs::key::rhai::RhaiKeyDeriver;
use podlogs::reconciler::{Reconciler, ReconcilerConfig};
use podlogs::store::s3::S3Store;
use podlogs_config::shared::{ControllerConfig, ObjectStoreConfig};
use podlogs_telemetry::metrics::{DEFAULT_METRICS_ADDRESS, init_metrics};
use tracing::{debug, info, warn};

type PodReconciler = Reconciler<HttpPodClient, S3Store, RhaiKeyDeriver>;

/// State shared by every reconciliation.
struct Context {
    reconciler: PodReconciler,
    retry_delay: Duration,
}

/// Starts the controller and runs it until SIGINT or SIGTERM.
///
/// Store credentials, the key expression and the cluster connection are all
/// checked up front, so a misconfigured controller exits before watching any pod.
pub async fn start_controller_with_config(config: ControllerConfig) -> anyhow::Result<()> {
    info!("starting pod log controller");

    log_config(&config);

    let store_config = ObjectStoreConfig::from_file(&config.store_config_path)?;
    let store = S3Store::new(&store_config).await;
    store.check_connection().await?;

    let key_deriver = RhaiKeyDeriver::compile(&config.log_key)?;
    let reconciler_config = ReconcilerConfig::from_controller_config(&config)?;
    let pods = HttpPodClient::new().await?;

    init_metrics(
        env!("CARGO_BIN_NAME"),
        SocketAddr::from(DEFAULT_METRICS_ADDRESS),
    )?;

    let watched: Api<Pod> = match &config.namespace {
        Some(namespace) => Api::namespaced(pods.client().clone(), namespace),
        None => Api::all(pods.client().clone()),
    };

    let context = Arc::new(Context {
        reconciler: Reconciler::new(reconciler_config, pods, store, key_deriver),
        retry_delay: Duration::from_millis(config.retry_delay_ms),
    });

    Controller::new(watched, watcher::Config::default())
        .shutdown_on_signal()
        .run(reconcile, error_policy, context)
        .for_each(|result| async move {
            match result {
                Ok((pod, _)) => debug!(pod = %pod, "reconciled pod"),
                Err(err) => debug!(error = %err, "reconciliation did not complete"),
            }
        })
        .await;

    info!("pod log controller stopped");

    Ok(())
}

fn log_config(config: &ControllerConfig) {
    debug!(
        namespace = config.namespace.as_deref().unwrap_or("<all>"),
        store_config_path = config.store_config_path,
        node_selector = ?config.node_selector,
        log_key = config.log_key,
        delete = config.delete,
        retry_delay_ms = config.retry_delay_ms,
        "controller config"
    );
}

async fn reconcile(pod: Arc<Pod>, context: Arc<Context>) -> Result<Action, PodLogsError> {
    let namespace = pod.namespace().unwrap_or_default();
    let name = pod.name_any();

    context.reconciler.reconcile(&namespace, &name).await?;

    Ok(Action::await_change())
}

fn error_policy(pod: Arc<Pod>, err: &PodLogsError, context: Arc<Context>) -> Action {
    warn!(
        namespace = pod.namespace().unwrap_or_default(),
        name = pod.name_any(),
        error = %err,
        retry_in_ms = context.retry_delay.as_millis() as u64,
        "requeueing pod"
    );

    Action::requeue(context.retry_delay)
}
