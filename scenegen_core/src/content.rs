//! Embedded content handling
//!
//! Image providers return results as self-describing inline payloads of the
//! form `data:<mediaType>;base64,<payload>`. This module parses and encodes
//! that representation and derives blob filenames for the store.

use crate::error::CacheError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha1::{Digest, Sha1};

/// A decoded embedded content payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedContent {
    /// Declared media type, e.g. `image/png`
    pub media_type: String,
    /// Decoded raw bytes
    pub bytes: Vec<u8>,
}

impl EmbeddedContent {
    /// Parse a `data:<mediaType>;base64,<payload>` URI
    ///
    /// Fails fast on any malformed input so the store can reject a write
    /// before touching the filesystem.
    pub fn parse(content: &str) -> Result<Self, CacheError> {
        let rest = content
            .strip_prefix("data:")
            .ok_or_else(|| CacheError::malformed_content("missing data: prefix"))?;

        let (media_type, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| CacheError::malformed_content("missing ;base64, marker"))?;

        if media_type.is_empty() || !media_type.contains('/') {
            return Err(CacheError::malformed_content(format!(
                "invalid media type: {media_type:?}"
            )));
        }

        let bytes = BASE64.decode(payload).map_err(|e| {
            CacheError::malformed_content(format!("invalid base64 payload: {e}"))
        })?;

        Ok(Self {
            media_type: media_type.to_string(),
            bytes,
        })
    }

    /// File extension for the declared media type
    ///
    /// Unknown image subtypes fall back to the subtype itself when it is a
    /// plain alphanumeric token, otherwise to `bin`.
    pub fn extension(&self) -> &str {
        match self.media_type.as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            other => {
                let subtype = other.split('/').nth(1).unwrap_or("");
                if !subtype.is_empty() && subtype.chars().all(|c| c.is_ascii_alphanumeric()) {
                    subtype
                } else {
                    "bin"
                }
            }
        }
    }

    /// Re-encode as a `data:` URI
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type,
            BASE64.encode(&self.bytes)
        )
    }
}

/// Derive the blob filename for a cache key and media extension
///
/// The name is a content-independent SHA-1 of the key, so rewriting a key
/// with identical media type lands on the same file (last write wins).
pub fn blob_file_name(key: &str, extension: &str) -> String {
    let digest = Sha1::digest(key.as_bytes());
    format!("{digest:x}.{extension}")
}
