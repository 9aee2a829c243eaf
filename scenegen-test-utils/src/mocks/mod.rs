//! Mock implementations for testing

mod provider;

pub use provider::{MockImageProvider, png_data_uri};
