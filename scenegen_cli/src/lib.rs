//! Library surface for the scenegen CLI
//!
//! Exposes configuration and path resolution so integration tests can
//! exercise them without spawning the binary.

pub mod config;
pub mod paths;
