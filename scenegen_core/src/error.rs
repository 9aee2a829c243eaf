//! Error types for the scenegen core library
//!
//! Errors are organized into two categories: cache errors (local storage and
//! index handling) and generation errors (the external image provider).

use thiserror::Error;

pub mod cache;
pub mod generation;

pub use cache::CacheError;
pub use generation::GenerationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the scenegen core library
///
/// Cache errors are recoverable by callers (a cache is not the source of
/// truth); generation errors are propagated verbatim to the top-level caller.
#[derive(Error, Debug)]
pub enum Error {
    /// Blob store and index errors
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Image provider errors
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Cache(CacheError::io("filesystem operation failed", source))
    }
}
