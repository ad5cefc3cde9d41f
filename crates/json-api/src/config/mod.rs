//! Server configuration module

use clap::Parser;

use crate::config::{
    flow::FlowConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
    twotap::TwoTapArgs,
};

pub(crate) mod flow;
pub(crate) mod observability;
pub(crate) mod server;
pub(crate) mod twotap;

/// Tapcart JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "tapcart-json", about = "Tapcart JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// TwoTap API credentials.
    #[command(flatten)]
    pub twotap: TwoTapArgs,

    /// Purchase flow settings.
    #[command(flatten)]
    pub flow: FlowConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}
