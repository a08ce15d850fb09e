//! Shotform Common Utilities
//!
//! Shared infrastructure for all Shotform crates:
//! - Error types and result aliases
//! - Frame timing for human-readable report output
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
