//! Image provider error types

use thiserror::Error;

/// Errors raised by the external image generation provider
///
/// These propagate verbatim to the caller of the cache-aside service; the
/// cache layer never retries a failed generation.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The provider rejected the configured credentials
    #[error("Image provider rejected credentials")]
    Auth,

    /// The provider rate limit was hit
    #[error("Image provider rate limit exceeded")]
    RateLimited,

    /// The provider returned an error response
    #[error("Image provider error {status}: {message}")]
    Provider { status: u16, message: String },

    /// The provider responded successfully but returned no images
    #[error("Image provider returned an empty result")]
    EmptyResult,

    /// The request to the provider failed at the transport level
    #[error("Image provider request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl GenerationError {
    /// Map an HTTP status code from the provider to an error variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::Auth,
            429 => Self::RateLimited,
            _ => Self::Provider {
                status,
                message: message.into(),
            },
        }
    }
}
