//! Tracing subscriber, optional OpenTelemetry export, and trace context
//! propagation for incoming requests.

use axum::body::Body;
use axum::http::Request;
use opentelemetry::global;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_http::HeaderExtractor;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::AppError;

/// Service name attached to exported spans.
pub const SERVICE_NAME: &str = "morra-player";

const TRACER_NAME: &str = "morra-api";

/// Keeps the tracer provider alive; flush it with [`TelemetryGuard::shutdown`]
/// before the process exits.
#[derive(Debug)]
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Flushes pending spans and stops the exporter.
    pub fn shutdown(self) {
        let Some(provider) = self.provider else {
            return;
        };
        if let Err(err) = provider.shutdown() {
            tracing::warn!(error = %err, "failed to shut down tracer provider");
        }
    }
}

/// Installs the global tracing subscriber: an `EnvFilter` (default `info`),
/// JSON log lines, and, when `otlp_endpoint` is set, an OpenTelemetry layer
/// exporting spans over OTLP/gRPC. Also installs the W3C trace context
/// propagator read by [`make_request_span`].
///
/// # Errors
///
/// Returns `AppError::Telemetry` if the exporter cannot be built or a global
/// subscriber is already installed.
pub fn init(otlp_endpoint: Option<&str>) -> Result<TelemetryGuard, AppError> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let provider = otlp_endpoint.map(build_tracer_provider).transpose()?;

    let otel_layer = provider
        .as_ref()
        .map(|provider| tracing_opentelemetry::layer().with_tracer(provider.tracer(TRACER_NAME)));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(otel_layer)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .map_err(|e| AppError::Telemetry(format!("failed to install subscriber: {e}")))?;

    Ok(TelemetryGuard { provider })
}

/// Builds the per-request span for `TraceLayer`, parented on the caller's
/// trace when the request carries a `traceparent` header.
pub fn make_request_span(request: &Request<Body>) -> Span {
    let span = tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
    );

    let parent = global::get_text_map_propagator(|propagator| {
        propagator.extract(&HeaderExtractor(request.headers()))
    });
    // Fails only when no OpenTelemetry layer is installed.
    let _ = span.set_parent(parent);

    span
}

fn build_tracer_provider(endpoint: &str) -> Result<SdkTracerProvider, AppError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| AppError::Telemetry(format!("failed to build OTLP exporter: {e}")))?;

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(Resource::builder().with_service_name(SERVICE_NAME).build())
        .build();

    global::set_tracer_provider(provider.clone());

    Ok(provider)
}
