//! Telemetry backend lifecycle.
//!
//! Owns the OTLP trace pipeline (batching exporter, tracer provider,
//! service resource) and the Prometheus metrics exporter. Constructed once
//! at startup and shared by handle; shut down explicitly so buffered spans
//! are flushed before exit.

use opentelemetry::trace::{SpanKind, TracerProvider};
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider};
use opentelemetry_sdk::Resource;
use std::borrow::Cow;

use crate::config::TelemetryConfig;
use crate::observability::metrics::{self, Metrics};
use crate::observability::span::{ActiveSpan, SpanScope};

/// Error type for telemetry initialization.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("failed to build OTLP span exporter: {0}")]
    Exporter(#[from] opentelemetry_otlp::ExporterBuildError),

    #[error("invalid metrics listen address '{addr}'")]
    MetricsAddress { addr: String },

    #[error("failed to install Prometheus exporter: {0}")]
    MetricsExporter(#[from] metrics_exporter_prometheus::BuildError),
}

/// Telemetry context: tracer, provider, and metrics handle.
///
/// Spans are exported in batches from a background thread; export failures
/// are logged by the SDK and never reach the request path.
pub struct Telemetry {
    tracer: SdkTracer,
    provider: SdkTracerProvider,
    metrics: Metrics,
}

impl Telemetry {
    /// Build the full export pipeline from configuration.
    ///
    /// Fails only at startup (bad exporter config, unparseable metrics
    /// address); the caller decides whether that is fatal.
    pub fn init(config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(&config.otlp_endpoint)
            .build()?;

        let resource = Resource::builder()
            .with_service_name(config.service_name.clone())
            .build();

        let provider = SdkTracerProvider::builder()
            .with_resource(resource)
            .with_batch_exporter(exporter)
            .build();

        if config.metrics_enabled {
            let addr = config.metrics_address.parse().map_err(|_| {
                TelemetryError::MetricsAddress {
                    addr: config.metrics_address.clone(),
                }
            })?;
            metrics::install_exporter(addr)?;
        }

        tracing::info!(
            service_name = %config.service_name,
            otlp_endpoint = %config.otlp_endpoint,
            metrics_enabled = config.metrics_enabled,
            "Telemetry initialized"
        );

        Ok(Self::with_provider(provider, config.service_name.clone()))
    }

    /// Build a telemetry context over an existing tracer provider.
    ///
    /// Used by tests to capture spans with an in-memory exporter.
    pub fn with_provider(provider: SdkTracerProvider, service_name: impl Into<Cow<'static, str>>) -> Self {
        let tracer = provider.tracer(service_name);
        Self {
            tracer,
            provider,
            metrics: Metrics,
        }
    }

    /// Open a root span for a logical operation.
    pub fn span(
        &self,
        name: impl Into<Cow<'static, str>>,
        kind: SpanKind,
        attributes: Vec<KeyValue>,
    ) -> SpanScope {
        SpanScope::start(&self.tracer, None, name, kind, attributes)
    }

    /// Open a span parented under `parent`.
    pub fn child_span(
        &self,
        parent: &ActiveSpan,
        name: impl Into<Cow<'static, str>>,
        kind: SpanKind,
        attributes: Vec<KeyValue>,
    ) -> SpanScope {
        SpanScope::start(&self.tracer, Some(&parent.0), name, kind, attributes)
    }

    /// Metrics recording handle.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Flush buffered spans and shut the pipeline down. Failures are
    /// logged, never raised.
    pub fn shutdown(&self) {
        if let Err(e) = self.provider.force_flush() {
            tracing::warn!(error = %e, "Failed to flush span exporter");
        }
        if let Err(e) = self.provider.shutdown() {
            tracing::warn!(error = %e, "Failed to shut down tracer provider");
        }
    }
}
