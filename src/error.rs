//! Error types for GCE API calls.

use thiserror::Error;

/// Errors raised while talking to the Compute Engine API.
///
/// Request execution produces exactly two kinds: [`GceError::Api`] for any
/// HTTP-level or transport-level failure, and [`GceError::Token`] when the
/// access token cannot be refreshed. [`GceError::Settings`] only occurs while
/// constructing a [`crate::GceProject`]. No caller performs recovery or
/// retries; errors propagate unchanged up to the demo helper, which converts
/// them into HTTP status codes.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum GceError {
    /// Raised when an API call fails at the HTTP or transport level.
    #[error("{message}")]
    Api {
        /// Human-readable failure description (status/reason or fixed text).
        message: String,
    },
    /// Raised when the access token fails to refresh.
    #[error("Access Token refresh error")]
    Token,
    /// Raised when the settings document cannot be loaded or is incomplete.
    #[error("settings error: {0}")]
    Settings(String),
}

impl GceError {
    /// Build the generic provider-call failure from an HTTP status.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        let message = match status.canonical_reason() {
            Some(reason) => format!("HttpError: {} {}", status.as_u16(), reason),
            None => format!("HttpError: {}", status.as_u16()),
        };
        Self::Api { message }
    }

    /// Build the fixed transport-level failure.
    pub fn transport() -> Self {
        Self::Api {
            message: "Transport Error occurred".to_string(),
        }
    }
}
