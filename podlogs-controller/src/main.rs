use std::sync::Arc;

use podlogs_config::Environment;
use podlogs_config::shared::ControllerConfig;
use podlogs_telemetry::init_tracing;
use tracing::{error, info};

use crate::config::load_controller_config;
use crate::core::start_controller_with_config;

mod config;
mod core;

fn main() -> anyhow::Result<()> {
    let controller_config = load_controller_config()?;

    let _log_flusher = init_tracing(env!("CARGO_BIN_NAME"))?;

    // Sentry must be set up before the async runtime starts.
    let _sentry_guard = init_sentry(&controller_config)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(controller_config))?;

    Ok(())
}

async fn async_main(controller_config: ControllerConfig) -> anyhow::Result<()> {
    if let Err(err) = start_controller_with_config(controller_config).await {
        sentry::integrations::anyhow::capture_anyhow(&err);
        error!("an error occurred in the controller: {err:#}");

        return Err(err);
    }

    Ok(())
}

/// Initializes Sentry when a DSN is configured, tagging events with the controller service.
fn init_sentry(config: &ControllerConfig) -> anyhow::Result<Option<sentry::ClientInitGuard>> {
    let Some(sentry_config) = &config.sentry else {
        info!("sentry not configured for controller, skipping initialization");
        return Ok(None);
    };

    info!("initializing sentry with supplied dsn");

    let environment = Environment::load()?;
    let guard = sentry::init(sentry::ClientOptions {
        dsn: Some(sentry_config.dsn.parse()?),
        environment: Some(environment.to_string().into()),
        integrations: vec![Arc::new(
            sentry::integrations::panic::PanicIntegration::new(),
        )],
        ..Default::default()
    });

    sentry::configure_scope(|scope| {
        scope.set_tag("service", "controller");
    });

    Ok(Some(guard))
}
