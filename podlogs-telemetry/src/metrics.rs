use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Default scrape address of the Prometheus endpoint.
pub const DEFAULT_METRICS_ADDRESS: ([u8; 4], u16) = ([0, 0, 0, 0], 9000);

/// Installs the global Prometheus recorder and serves it on `address` under `/metrics`.
///
/// Must be called from within a Tokio runtime since the exporter spawns its HTTP
/// listener on it. Every metric gets a `service` label set to `service`.
pub fn init_metrics(service: &str, address: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(address)
        .add_global_label("service", service)
        .install()
}
