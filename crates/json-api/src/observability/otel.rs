//! OpenTelemetry tracer provider setup.

use std::time::Duration;

use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    trace::{RandomIdGenerator, Sampler, SdkTracerProvider},
};

use crate::config::ServerConfig;

use super::ObservabilityError;

const EXPORT_TIMEOUT: Duration = Duration::from_secs(3);

pub(super) fn build_tracer_provider(
    config: &ServerConfig,
) -> Result<SdkTracerProvider, ObservabilityError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(config.observability.otel_exporter_otlp_endpoint.clone())
        .with_timeout(EXPORT_TIMEOUT)
        .build()?;

    // Follow the caller's sampling decision, sample everything at the root.
    Ok(SdkTracerProvider::builder()
        .with_sampler(Sampler::ParentBased(Box::new(Sampler::AlwaysOn)))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(service_resource(config))
        .with_batch_exporter(exporter)
        .build())
}

fn service_resource(config: &ServerConfig) -> Resource {
    Resource::builder_empty()
        .with_service_name(config.observability.otel_service_name.clone())
        .with_attributes([
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            KeyValue::new(
                "deployment.environment.name",
                config.server.environment.clone(),
            ),
        ])
        .build()
}
