//! TwoTap client errors.

use thiserror::Error;

/// Errors that can occur when communicating with TwoTap.
#[derive(Debug, Error)]
pub enum TwoTapError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// TwoTap returned a non-2xx response.
    #[error("unexpected response from TwoTap: {0}")]
    UnexpectedResponse(String),

    /// The response body did not have the expected shape.
    #[error("could not decode TwoTap response: {0}")]
    Decode(#[from] serde_json::Error),
}
