//! Test utilities for the scenegen pipeline
//!
//! This crate provides mock implementations for testing components that
//! depend on the image generation provider without network connectivity.

pub mod mocks;

// Re-export commonly used types
pub use mocks::{MockImageProvider, png_data_uri};
