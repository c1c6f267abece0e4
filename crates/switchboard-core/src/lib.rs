//! Shared foundation for the Switchboard action pipeline.
//!
//! Holds the value types, configuration, error umbrella, and tracing
//! setup used by the extraction and pipeline crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::SwitchboardConfig;
pub use error::{Result, SwitchboardError};
pub use types::Timestamp;
