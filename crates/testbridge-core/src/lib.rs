//! Testbridge Core - shared vocabulary for the test engine bridge
//!
//! This crate provides the version types, error handling and configuration
//! used by engine discovery and by the run pipeline.

pub mod config;
pub mod error;
pub mod version;

pub use error::{BridgeError, ConfigError, Result, VersionError};
pub use version::{EngineVersion, RuntimeVersion};
