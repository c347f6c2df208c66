//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the toolgate core.
///
/// Environment failures (remote endpoint down, config file unreadable) are
/// absorbed close to where they occur; per-call failures (unknown tool, bad
/// parameters, tool's own failure) propagate to the caller through these
/// variants.
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown tool name.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// Known tool, but its config entry is disabled.
    #[error("tool disabled: {0}")]
    Disabled(String),

    /// Parameter shape/type mismatch, with a field-level summary.
    #[error("validation error: {0}")]
    Validation(String),

    /// The tool's own logic, or the remote delegate call, failed.
    #[error("tool execution failed: {0}")]
    Execution(String),

    /// Persisted tool configuration unreadable or corrupt.
    #[error("config load error: {0}")]
    ConfigLoad(String),

    /// Remote tool registry fetch exhausted its retries.
    #[error("remote load error: {0}")]
    RemoteLoad(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenience constructors
impl Error {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn disabled(msg: impl Into<String>) -> Self {
        Self::Disabled(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    pub fn config_load(msg: impl Into<String>) -> Self {
        Self::ConfigLoad(msg.into())
    }

    pub fn remote_load(msg: impl Into<String>) -> Self {
        Self::RemoteLoad(msg.into())
    }
}
