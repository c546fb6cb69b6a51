use std::net::TcpListener;
use std::sync::Arc;

use actix_web::{App, HttpServer, dev::Server, web};
use podlogs::store::ContentStore;
use podlogs::store::s3::S3Store;
use podlogs_config::shared::{ObjectStoreConfig, ServerConfig};
use tracing::info;
use tracing_actix_web::TracingLogger;

use crate::routes::logs::read_logs;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Connects to the object store and binds the listener.
    ///
    /// Fails when the store configuration cannot be read or the bucket is unreachable.
    pub async fn build(config: ServerConfig) -> Result<Self, anyhow::Error> {
        let store_config = ObjectStoreConfig::from_file(&config.store_config_path)?;
        let store = S3Store::new(&store_config).await;
        store.check_connection().await?;

        let listener = TcpListener::bind(config.application.to_string())?;
        let port = listener.local_addr()?.port();
        info!(address = %config.application, port, "binding retrieval server");

        let server = run(listener, Arc::new(store))?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(listener: TcpListener, store: Arc<dyn ContentStore>) -> Result<Server, anyhow::Error> {
    let store: web::Data<dyn ContentStore> = web::Data::from(store);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                sentry::integrations::actix::Sentry::builder()
                    .capture_server_errors(true)
                    .finish(),
            )
            .wrap(TracingLogger::default())
            .service(read_logs)
            .app_data(store.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
