//! Observability setup.
//!
//! Installs the global tracing subscriber: an `EnvFilter` driven by RUST_LOG
//! (default `info`), a plain-text stderr layer, and, when
//! OTEL_EXPORTER_OTLP_ENDPOINT is set, an OpenTelemetry layer exporting spans
//! over OTLP/gRPC.

use crate::config::AppConfig;
use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Keeps the tracer provider alive; call [`ObservabilityGuard::shutdown`] to flush spans.
#[must_use]
pub struct ObservabilityGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl ObservabilityGuard {
    /// Flush and stop the OpenTelemetry exporter, if one was started.
    pub fn shutdown(self) {
        if let Some(provider) = self.tracer_provider {
            if let Err(e) = provider.shutdown() {
                warn!("Failed to shut down tracer provider: {}", e);
            }
        }
    }
}

fn build_tracer_provider(
    service_name: &str,
    endpoint: &str,
) -> anyhow::Result<SdkTracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let resource = Resource::builder()
        .with_attributes([
            KeyValue::new(SERVICE_NAME, service_name.to_string()),
            KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        ])
        .build();

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build())
}

/// Initialize tracing and, if configured, OpenTelemetry export.
pub fn init_observability(config: &AppConfig) -> anyhow::Result<ObservabilityGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false);

    let tracer_provider = match config.otel_exporter_endpoint.as_deref() {
        Some(endpoint) => Some(build_tracer_provider(&config.otel_service_name, endpoint)?),
        None => None,
    };
    let otel_layer = tracer_provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(config.otel_service_name.clone()))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()?;

    match config.otel_exporter_endpoint.as_deref() {
        Some(endpoint) => info!(
            "Initialized OpenTelemetry with service_name={}, endpoint={}",
            config.otel_service_name, endpoint
        ),
        None => info!(
            "Observability initialized (OpenTelemetry disabled - set OTEL_EXPORTER_OTLP_ENDPOINT to enable)"
        ),
    }

    Ok(ObservabilityGuard { tracer_provider })
}
