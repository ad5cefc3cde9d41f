//! Purchase Flow Config

use std::{path::PathBuf, time::Duration};

use clap::Args;

use tapcart::checkout::{CheckoutProfile, CheckoutProfileError};
use tapcart_app::purchases::{CallbackUrls, FlowMode, PollSettings, PurchasesConfig};

/// Purchase flow settings.
#[derive(Debug, Args)]
pub struct FlowConfig {
    /// How TwoTap reports finished carts and purchases (polling, webhook)
    #[arg(long, env = "FLOW_MODE", value_enum, default_value_t = FlowMode::Polling)]
    pub flow_mode: FlowMode,

    /// Public address TwoTap uses to reach this server's callbacks
    #[arg(long, env = "PUBLIC_BASE_URL", default_value = "http://localhost:5000")]
    pub public_base_url: String,

    /// Phone number used for SMS purchase confirmation
    #[arg(long, env = "CONFIRM_PHONE", default_value = "5555555555")]
    pub confirm_phone: String,

    /// Initial delay between status checks in milliseconds
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 2_000_u64)]
    pub poll_interval_ms: u64,

    /// Maximum delay between status checks in milliseconds
    #[arg(long, env = "POLL_MAX_INTERVAL_MS", default_value_t = 16_000_u64)]
    pub poll_max_interval_ms: u64,

    /// Give up polling after this many seconds
    #[arg(long, env = "POLL_TIMEOUT_SECONDS", default_value_t = 120_u64)]
    pub poll_timeout_seconds: u64,

    /// YAML checkout profile replacing the default placeholder profile
    #[arg(long, env = "CHECKOUT_PROFILE")]
    pub checkout_profile: Option<PathBuf>,
}

impl FlowConfig {
    /// Resolve the purchase flow settings, loading the checkout profile if one
    /// is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkout profile cannot be loaded.
    pub fn purchases_config(&self) -> Result<PurchasesConfig, CheckoutProfileError> {
        let profile = match &self.checkout_profile {
            Some(path) => CheckoutProfile::from_yaml_file(path)?,
            None => CheckoutProfile::default(),
        };

        Ok(PurchasesConfig {
            mode: self.flow_mode,
            callbacks: CallbackUrls::from_base(&self.public_base_url),
            confirm_phone: self.confirm_phone.clone(),
            polling: PollSettings {
                interval: Duration::from_millis(self.poll_interval_ms),
                max_interval: Duration::from_millis(self.poll_max_interval_ms),
                timeout: Duration::from_secs(self.poll_timeout_seconds),
            },
            profile,
        })
    }
}
