//! Cache related error types

use thiserror::Error;

/// Errors raised by the blob store and index handling
///
/// A corrupt index is not represented here: the store recovers from it
/// locally by starting from an empty cache. Failures removing stale blob
/// files are logged and swallowed on the delete paths; only errors that
/// prevent an operation from completing are surfaced through this type.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Embedded content did not parse as a `data:<media>;base64,<payload>` URI
    #[error("Malformed embedded content: {reason}")]
    MalformedContent { reason: String },

    /// Filesystem operation failed
    #[error("Cache I/O failure while {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Index document could not be serialized for persistence
    #[error("Failed to serialize cache index: {0}")]
    IndexSerialization(#[from] serde_json::Error),
}

impl CacheError {
    /// Create a malformed content error
    pub fn malformed_content(reason: impl Into<String>) -> Self {
        Self::MalformedContent {
            reason: reason.into(),
        }
    }

    /// Create an I/O error with operation context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
