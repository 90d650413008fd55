//! Tracing initialization and subscriber setup.

use super::exporter;
use crate::infrastructure::paths::{get_data_dir, SPANS_FILE};
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use std::path::Path;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "country-browser";

const DEFAULT_LEVEL: &str = "info";

/// Installs the global subscriber, exporting spans into the plugin data
/// directory.
///
/// Observability is optional: if the directory cannot be created the plugin
/// runs without tracing. Only the first call takes effect.
pub fn init_tracing(config: &Config) {
    init_tracing_at(config, &get_data_dir());
}

/// Same as [`init_tracing`], with an explicit data directory.
pub fn init_tracing_at(config: &Config, data_dir: &Path) {
    if std::fs::create_dir_all(data_dir).is_err() {
        return;
    }

    let level = config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL);
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let resource = Resource::new(vec![
        opentelemetry::KeyValue::new("service.name", SERVICE_NAME),
        opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);

    let provider = exporter::create_tracer_provider(data_dir.join(SPANS_FILE), resource);
    let tracer = provider.tracer(SERVICE_NAME);

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(OpenTelemetryLayer::new(tracer));

    if subscriber.try_init().is_ok() {
        tracing::info!(level, endpoint = %config.endpoint, "tracing initialized");
    }
}
