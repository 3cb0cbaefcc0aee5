//! Error types for the platform client library.

use thiserror::Error;

/// Result type alias for platform calls.
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Errors surfaced by calls against the hosted platform.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The request never produced a usable response (DNS, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("platform rejected the call ({status}): {message}")]
    Api { status: u16, message: String },

    /// A URL could not be built from the configured endpoint.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The platform answered with a body this client cannot interpret.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl PlatformError {
    /// True when the platform reported the target resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlatformError::Api { status: 404, .. })
    }
}
