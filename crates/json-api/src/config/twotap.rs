//! TwoTap Config

use clap::Args;

use tapcart_app::twotap::{DEFAULT_BASE_URL, PrivateToken, TwoTapConfig};

/// TwoTap API credentials.
#[derive(Debug, Args)]
pub struct TwoTapArgs {
    /// TwoTap API root
    #[arg(long = "twotap-base-url", env = "TWOTAP_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// TwoTap public token
    #[arg(long = "twotap-public-token", env = "TWOTAP_PUBLIC_TOKEN")]
    pub public_token: String,

    /// TwoTap private token
    #[arg(
        long = "twotap-private-token",
        env = "TWOTAP_PRIVATE_TOKEN",
        hide_env_values = true
    )]
    pub private_token: String,

    /// TwoTap test mode (fake_confirm, dummy_data)
    #[arg(long = "twotap-test-mode", env = "TWOTAP_TEST_MODE")]
    pub test_mode: Option<String>,
}

impl From<TwoTapArgs> for TwoTapConfig {
    fn from(args: TwoTapArgs) -> Self {
        TwoTapConfig {
            base_url: args.base_url,
            public_token: args.public_token,
            private_token: PrivateToken::new(args.private_token),
            test_mode: args.test_mode,
        }
    }
}
