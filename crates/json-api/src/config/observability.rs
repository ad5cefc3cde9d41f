//! Logging and telemetry settings

use clap::Args;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// One JSON object per line.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level or filter directives (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Telemetry settings. Trace export is off unless `OTEL_ENABLED` is set.
#[derive(Debug, Args)]
pub struct ObservabilityConfig {
    /// Export request spans over OTLP
    #[arg(long, env = "OTEL_ENABLED", default_value_t = false)]
    pub otel_enabled: bool,

    /// OTLP gRPC collector endpoint
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT", default_value = "http://localhost:4317")]
    pub otel_endpoint: String,

    /// Service name reported on exported spans
    #[arg(long, env = "OTEL_SERVICE_NAME", default_value = "tapcart-json")]
    pub otel_service_name: String,

    /// Fraction of root spans to sample, clamped to [0.0, 1.0]
    #[arg(long, env = "OTEL_TRACE_SAMPLE_RATIO", default_value_t = 1.0_f64)]
    pub otel_sample_ratio: f64,

    /// Warn about requests slower than this. Polling purchases routinely take
    /// tens of seconds, so the default is generous.
    #[arg(long, env = "SLOW_REQUEST_THRESHOLD_MS", default_value_t = 30_000_u64)]
    pub slow_request_threshold_ms: u64,
}
