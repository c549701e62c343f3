//! Error types for running tests

use std::path::PathBuf;
use thiserror::Error;

use testbridge_core::BridgeError;

/// Result type for run operations
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Errors that abort a run
///
/// Test failures are never errors; they are reported as outcomes.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The engine itself faulted
    #[error("Engine '{engine}' failed: {message}")]
    Engine { engine: String, message: String },

    /// Target could not be loaded into the engine
    #[error("Failed to load {path}: {message}")]
    Load { path: PathBuf, message: String },

    /// Assembly manifest could not be parsed
    #[error("Invalid assembly manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Request cannot be served
    #[error("Invalid run request: {0}")]
    InvalidRequest(String),

    /// Stack trace filter pattern did not compile
    #[error("Invalid stack trace filter: {0}")]
    StackTraceFilter(#[from] regex::Error),

    /// Discovery or configuration error
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RunnerError {
    /// Create an engine fault
    pub fn engine(engine: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Engine {
            engine: engine.into(),
            message: message.into(),
        }
    }

    /// Create a load failure
    pub fn load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Get exit code for CLI
    ///
    /// Codes 0-2 are reserved for run states.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Engine { .. } => 10,
            Self::Load { .. } => 11,
            Self::Manifest { .. } => 12,
            Self::InvalidRequest(_) => 13,
            Self::StackTraceFilter(_) => 4,
            Self::Bridge(_) => 4,
            Self::Io(_) => 7,
        }
    }
}
