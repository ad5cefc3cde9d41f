//! Purchase flow settings.

use std::time::Duration;

use tokio::time::Instant;

use tapcart::checkout::CheckoutProfile;

/// How the flow learns that TwoTap has finished with a cart or purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum FlowMode {
    /// Poll the status endpoints until processing finishes.
    Polling,

    /// Let TwoTap call `cart_finished` and `purchase_finished`.
    Webhook,
}

/// Status polling bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay before the first status check.
    pub interval: Duration,

    /// Upper bound for the doubling delay between checks.
    pub max_interval: Duration,

    /// Give up after this long.
    pub timeout: Duration,
}

impl PollSettings {
    /// Point in time at which a purchase started now must be given up on.
    #[must_use]
    pub fn deadline(&self) -> Instant {
        Instant::now() + self.timeout
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_interval: Duration::from_secs(16),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Callback URLs TwoTap is given, derived from this service's public address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackUrls {
    pub cart_finished: String,
    pub purchase_confirm: String,
    pub purchase_finished: String,
}

impl CallbackUrls {
    #[must_use]
    pub fn from_base(public_base_url: &str) -> Self {
        let base = public_base_url.trim_end_matches('/');

        Self {
            cart_finished: format!("{base}/cart_finished"),
            purchase_confirm: format!("{base}/purchase_confirm"),
            purchase_finished: format!("{base}/purchase_finished"),
        }
    }
}

/// Everything the purchase flow needs besides the TwoTap client.
#[derive(Debug, Clone)]
pub struct PurchasesConfig {
    pub mode: FlowMode,
    pub callbacks: CallbackUrls,
    pub confirm_phone: String,
    pub polling: PollSettings,
    pub profile: CheckoutProfile,
}
