//! Tool error types

use thiserror::Error;

/// Failure of a single tool invocation
///
/// The dispatcher turns every variant into conversation text; these never
/// reach the session boundary.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The data source does not exist on this machine
    #[error("{0} is not available on this system")]
    Unavailable(String),

    /// Reading system state failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Result could not be serialized
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The tool panicked while running
    #[error("tool panicked: {0}")]
    Panicked(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ToolError {
    /// Create an "other" error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Errors raised while building a registry
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// A tool with this name is already registered
    #[error("Tool '{0}' is already registered")]
    DuplicateName(String),
}

/// Result type for registry construction
pub type RegistryResult<T> = Result<T, RegistryError>;
