//! Remote tool loading and execution.
//!
//! The loader populates the remote registry from one configured endpoint
//! returning `{"tools": [...]}`, with bounded fixed-delay retries, and
//! issues the delegated execution calls for remote tools. Load exhaustion
//! surfaces as [`Error::RemoteLoad`]; the manager absorbs it and stays
//! usable with zero remote tools.

use crate::registry::RemoteToolDefinition;
use crate::types::{Error, RemoteApiConfig, Result};
use chrono::Utc;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("toolgate/", env!("CARGO_PKG_VERSION"));
const DEFAULT_EXECUTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Document returned by the remote tools endpoint.
#[derive(Debug, Deserialize)]
struct RemoteToolsResponse {
    tools: Option<Vec<RemoteToolDefinition>>,
    #[allow(dead_code)]
    version: Option<String>,
    #[allow(dead_code)]
    timestamp: Option<String>,
}

/// Body POSTed to a remote tool's execute address.
#[derive(Debug, Serialize)]
struct RemoteExecutionRequest<'a> {
    tool: &'a str,
    parameters: &'a Value,
    timestamp: String,
}

/// Response expected from a remote tool's execute address.
#[derive(Debug, Deserialize)]
struct RemoteExecutionResponse {
    success: bool,
    result: Option<Value>,
    error: Option<String>,
    #[allow(dead_code)]
    #[serde(rename = "executedAt")]
    executed_at: Option<String>,
}

/// Fetches remote tool definitions and delegates remote executions.
#[derive(Debug, Clone)]
pub struct RemoteToolLoader {
    client: reqwest::Client,
    config: RemoteApiConfig,
}

impl RemoteToolLoader {
    pub fn new(config: RemoteApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Fetch the full remote tool set.
    ///
    /// Retries up to `retry_attempts` times with a fixed delay between
    /// attempts. A missing `tools` array counts as a failed attempt, the
    /// same as a network or timeout failure. The result fully replaces any
    /// previous load; no merge with earlier fetches happens here.
    pub async fn fetch_tools(&self) -> Result<Vec<RemoteToolDefinition>> {
        let Some(url) = self.config.tools_url.as_deref() else {
            warn!("remote API enabled but no tools_url provided");
            return Ok(Vec::new());
        };

        let max_attempts = self.config.retry_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            debug!(url, attempt, max_attempts, "loading remote tools");

            match self.fetch_once(url).await {
                Ok(tools) => {
                    info!(count = tools.len(), "loaded remote tools");
                    return Ok(tools);
                }
                Err(e) => {
                    warn!(attempt, max_attempts, error = %e, "failed to load remote tools");
                    last_error = e.to_string();
                    if attempt < max_attempts {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        Err(Error::remote_load(format!(
            "exhausted {} attempts against {}: {}",
            max_attempts, url, last_error
        )))
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<RemoteToolDefinition>> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| Error::remote_load(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::remote_load(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let body: RemoteToolsResponse = response
            .json()
            .await
            .map_err(|e| Error::remote_load(format!("invalid response body: {}", e)))?;

        body.tools
            .ok_or_else(|| Error::remote_load("invalid response format: missing tools array"))
    }

    /// Execute a remote tool by calling its execute address.
    ///
    /// A `{success: false, error}` body surfaces the tool's logical failure
    /// message; a non-success HTTP status and a network-level failure are
    /// surfaced with distinct messages. All three map to [`Error::Execution`].
    pub async fn execute(&self, tool: &RemoteToolDefinition, parameters: &Value) -> Result<Value> {
        let method = match tool.method.as_deref() {
            None => Method::POST,
            Some(m) => Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                .map_err(|_| Error::execution(format!("invalid HTTP method '{}'", m)))?,
        };
        let timeout = tool
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_EXECUTE_TIMEOUT);

        let body = RemoteExecutionRequest {
            tool: &tool.name,
            parameters,
            timestamp: Utc::now().to_rfc3339(),
        };

        let mut request = self
            .client
            .request(method, &tool.execute_url)
            .header("User-Agent", USER_AGENT)
            .timeout(timeout)
            .json(&body);
        if let Some(headers) = &tool.headers {
            for (name, value) in headers {
                request = request.header(name, value);
            }
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                Error::execution(format!(
                    "remote tool '{}': no response from server ({})",
                    tool.name, e
                ))
            } else {
                Error::execution(format!("remote tool '{}': {}", tool.name, e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::execution(format!(
                "remote tool '{}': server returned {}",
                tool.name, status
            )));
        }

        let body: RemoteExecutionResponse = response.json().await.map_err(|e| {
            Error::execution(format!("remote tool '{}': invalid response: {}", tool.name, e))
        })?;

        if body.success {
            Ok(body.result.unwrap_or(Value::Null))
        } else {
            Err(Error::execution(
                body.error
                    .unwrap_or_else(|| format!("remote tool '{}' reported failure", tool.name)),
            ))
        }
    }
}
