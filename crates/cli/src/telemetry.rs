//! Observability wiring.
//!
//! Every crate in the workspace emits `tracing` spans and events; this module
//! installs the one subscriber that receives them:
//!
//! - an [`EnvFilter`] driven by `RUST_LOG` (`warn` by default, `debug` with
//!   `--verbose`),
//! - a JSON formatting layer on stderr, so stdout carries only command output,
//! - an OpenTelemetry OTLP span exporter, only when an endpoint is configured.

use anyhow::Context;
use clap::Args;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::Resource;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const SERVICE_NAME: &str = "ufm";

#[derive(Args, Debug, Clone, Default)]
pub struct TelemetryArgs {
    /// Log debug events, including every UFM request.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// OTLP gRPC collector to export spans to.
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT", global = true)]
    pub otlp_endpoint: Option<String>,
}

impl TelemetryArgs {
    fn default_directive(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

/// Handle to the installed pipeline; call [`Telemetry::shutdown`] before exit
/// so batched spans are flushed.
pub struct Telemetry {
    provider: Option<TracerProvider>,
}

/// Installs the global subscriber. Must run inside the Tokio runtime when an
/// OTLP endpoint is set.
pub fn init(args: &TelemetryArgs) -> anyhow::Result<Telemetry> {
    let filter = if args.verbose {
        EnvFilter::new(args.default_directive())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(args.default_directive()))
    };

    let (otel_layer, provider) = match args.otlp_endpoint.as_deref() {
        Some(endpoint) if !endpoint.is_empty() => {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint)
                .build()
                .with_context(|| format!("failed to build OTLP exporter for '{endpoint}'"))?;
            let provider = TracerProvider::builder()
                .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
                .with_resource(Resource::new([KeyValue::new("service.name", SERVICE_NAME)]))
                .build();
            let layer = tracing_opentelemetry::layer().with_tracer(provider.tracer(SERVICE_NAME));
            (Some(layer), Some(provider))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(otel_layer)
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(Telemetry { provider })
}

impl Telemetry {
    pub fn shutdown(self) {
        if let Some(provider) = self.provider {
            if let Err(e) = provider.shutdown() {
                eprintln!("failed to flush spans: {e}");
            }
        }
    }
}
