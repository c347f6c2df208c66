//! Shared types - configuration and errors.

pub mod config;
pub mod errors;

pub use config::{Config, ObservabilityConfig, RemoteApiConfig, ToolConfigFile};
pub use errors::{Error, Result};
