#![allow(unused_imports)] // some used only for telemetry feature
use crate::{Error, Result};

use opentelemetry::trace::TraceId;
use std::str::FromStr;
use tracing_subscriber::{prelude::*, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "info";

/// Output format of the stdout log layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("json") {
            Ok(LogFormat::Json)
        } else {
            Ok(LogFormat::Compact)
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TelemetryConfig {
    pub format: LogFormat,
    /// OTLP collector, only honoured with the `telemetry` feature
    pub otlp_endpoint: Option<String>,
}

///  Fetch an opentelemetry::trace::TraceId as hex through the full tracing stack
pub fn get_trace_id() -> TraceId {
    use opentelemetry::trace::TraceContextExt as _; // opentelemetry::Context -> opentelemetry::trace::Span
    use tracing_opentelemetry::OpenTelemetrySpanExt as _; // tracing::Span to opentelemetry::Context

    tracing::Span::current()
        .context()
        .span()
        .span_context()
        .trace_id()
}

#[cfg(feature = "telemetry")]
async fn init_tracer(otlp_endpoint: &str) -> Result<opentelemetry::sdk::trace::Tracer> {
    let channel = tonic::transport::Channel::from_shared(otlp_endpoint.to_string())
        .map_err(|e| Error::TelemetryError(e.to_string()))?
        .connect()
        .await
        .map_err(|e| Error::TelemetryError(e.to_string()))?;

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(opentelemetry_otlp::new_exporter().tonic().with_channel(channel))
        .with_trace_config(opentelemetry::sdk::trace::config().with_resource(
            opentelemetry::sdk::Resource::new(vec![opentelemetry::KeyValue::new(
                "service.name",
                "kube-restarter",
            )]),
        ))
        .install_batch(opentelemetry::runtime::Tokio)
        .map_err(|e| Error::TelemetryError(e.to_string()))
}

/// Initialize tracing
///
/// Events go to stdout, filtered by `RUST_LOG` (falls back to `info`).
pub async fn init(config: &TelemetryConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| Error::TelemetryError(e.to_string()))?;

    let logger = match config.format {
        LogFormat::Compact => tracing_subscriber::fmt::layer().compact().with_target(false).boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer().json().with_target(false).boxed(),
    };

    #[cfg(feature = "telemetry")]
    let telemetry = match &config.otlp_endpoint {
        Some(endpoint) => Some(tracing_opentelemetry::layer().with_tracer(init_tracer(endpoint).await?)),
        None => None,
    };

    #[cfg(feature = "telemetry")]
    let collector = Registry::default().with(telemetry).with(logger).with(env_filter);
    #[cfg(not(feature = "telemetry"))]
    let collector = Registry::default().with(logger).with(env_filter);

    tracing::subscriber::set_global_default(collector).map_err(|e| Error::TelemetryError(e.to_string()))
}
