use std::sync::Arc;

use podlogs_config::Environment;
use podlogs_config::shared::ServerConfig;
use podlogs_server::config::load_server_config;
use podlogs_server::startup::Application;
use podlogs_telemetry::init_tracing;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let config = load_server_config()?;

    let _log_flusher = init_tracing(env!("CARGO_BIN_NAME"))?;

    // Sentry must be set up before the async runtime starts.
    let _sentry_guard = init_sentry(&config)?;

    actix_web::rt::System::new().block_on(async_main(config))?;

    Ok(())
}

async fn async_main(config: ServerConfig) -> anyhow::Result<()> {
    let application = match Application::build(config).await {
        Ok(application) => application,
        Err(err) => {
            sentry::integrations::anyhow::capture_anyhow(&err);
            error!("failed to start the retrieval server: {err:#}");

            return Err(err);
        }
    };

    info!(port = application.port(), "retrieval server started");
    application.run_until_stopped().await?;

    Ok(())
}

/// Initializes Sentry when a DSN is configured, tagging events with the server service.
fn init_sentry(config: &ServerConfig) -> anyhow::Result<Option<sentry::ClientInitGuard>> {
    let Some(sentry_config) = &config.sentry else {
        info!("sentry not configured for server, skipping initialization");
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
        scope.set_tag("service", "server");
    });

    Ok(Some(guard))
}
