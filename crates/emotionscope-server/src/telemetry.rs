//! Logging and metrics initialization

use anyhow::Result;
use std::net::SocketAddr;
use tracing::info;

/// Initialize tracing/logging
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("emotionscope=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("emotionscope=info,tower_http=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Install the Prometheus exporter with its own scrape listener
pub fn init_metrics(listen: SocketAddr) -> Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    PrometheusBuilder::new()
        .with_http_listener(listen)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    metrics::describe_counter!(
        "emotionscope_requests_total",
        "Total number of analyze requests by response status"
    );
    metrics::describe_histogram!(
        "emotionscope_inference_latency_us",
        metrics::Unit::Microseconds,
        "Model inference latency in microseconds"
    );

    info!("Metrics exporter listening on http://{}/metrics", listen);
    Ok(())
}
