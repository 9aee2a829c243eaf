//! Cache key derivation
//!
//! Turns a request descriptor (ordered search terms plus orientation) into a
//! stable, filesystem-safe cache key. Derivation is a pure total function and
//! is shared by every lookup and write path so the two always agree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target orientation for a generated scene image
///
/// Carries the canonical pixel dimensions used both for the generation
/// request and for the asset returned on a cache hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Lowercase tag appended to the cache key
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }

    /// Canonical (width, height) in pixels for this orientation
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Portrait => (1024, 1792),
            Self::Landscape => (1792, 1024),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Derive the cache key for a request
///
/// The ordered terms are joined with `-`, the orientation tag is appended,
/// and the result is reduced to lowercase letters, digits and hyphens (every
/// other character maps to `-`). Term order is significant: callers wanting
/// key stability across reordered terms must order them consistently
/// themselves. An empty term list yields the orientation tag alone.
pub fn derive_cache_key<S: AsRef<str>>(terms: &[S], orientation: Orientation) -> String {
    let joined = terms
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("-");

    let raw = if joined.is_empty() {
        orientation.tag().to_string()
    } else {
        format!("{joined}-{}", orientation.tag())
    };

    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}
