//! Configuration structures.
//!
//! Configuration is loaded from CLI flags and environment variables; all
//! structs carry serde defaults so partial config files also work.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Global gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote tool API configuration.
    #[serde(default)]
    pub remote: RemoteApiConfig,

    /// Tool enable/disable persistence.
    #[serde(default)]
    pub tool_config: ToolConfigFile,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Remote tool loading configuration.
///
/// Immutable once the manager is constructed; governs only how the remote
/// registry is fetched and refreshed, not the enable/disable store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteApiConfig {
    /// Whether remote tool loading is enabled at all.
    pub enabled: bool,

    /// Endpoint returning `{"tools": [...]}` on GET.
    pub tools_url: Option<String>,

    /// Per-request timeout for registry fetches.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Bounded number of fetch attempts.
    pub retry_attempts: u32,

    /// Fixed delay between attempts (no backoff).
    #[serde(with = "humantime_serde")]
    pub retry_delay: Duration,
}

impl Default for RemoteApiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tools_url: None,
            timeout: Duration::from_secs(5),
            retry_attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Location of the persisted per-tool enabled/disabled state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfigFile {
    /// Path to the JSON file holding `{toolName, enabled}` records.
    pub path: PathBuf,
}

impl Default for ToolConfigFile {
    fn default() -> Self {
        Self {
            path: PathBuf::from("tool-config.json"),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
