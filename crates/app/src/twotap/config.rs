//! TwoTap client configuration.

use std::fmt;

use zeroize::Zeroize;

/// Default TwoTap API root.
pub const DEFAULT_BASE_URL: &str = "https://api.twotap.com";

/// Configuration for talking to the TwoTap API.
#[derive(Debug, Clone)]
pub struct TwoTapConfig {
    /// API root, e.g. `"https://api.twotap.com"`.
    pub base_url: String,

    /// Public token, sent with cart and purchase calls.
    pub public_token: String,

    /// Private token, only sent when confirming a purchase.
    pub private_token: PrivateToken,

    /// TwoTap test mode (`fake_confirm`, `dummy_data`), if any.
    pub test_mode: Option<String>,
}

/// The TwoTap private token. Redacted in debug output and wiped on drop.
#[derive(Clone)]
pub struct PrivateToken(String);

impl PrivateToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PrivateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateToken(**redacted**)")
    }
}

impl Drop for PrivateToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}
