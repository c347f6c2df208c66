//! Stdio transport - a line-delimited JSON command loop over stdin/stdout.
//!
//! Each request line is `{"id", "method", "params"}`; each response line is
//! `{"id", "success", "result" | "error"}`. Tool-set changes surface as
//! unsolicited `{"method": "notifications/tools/list_changed"}` lines.
//! This adapter only serializes; all semantics live in the manager.

use crate::manager::ToolManager;
use crate::registry::ToolKind;
use crate::types::{Error, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct CommandRequest {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    params: Value,
}

/// Serves the manager over stdin/stdout until EOF.
#[derive(Debug)]
pub struct StdioServer {
    manager: Arc<ToolManager>,
}

impl StdioServer {
    pub fn new(manager: Arc<ToolManager>) -> Self {
        Self { manager }
    }

    pub async fn serve(self) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        self.manager.set_on_tools_changed(move || {
            let _ = tx.send(());
        });

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    let response = self.handle_line(&line).await;
                    write_line(&mut stdout, &response).await?;
                }
                Some(()) = rx.recv() => {
                    let notification = json!({"method": "notifications/tools/list_changed"});
                    write_line(&mut stdout, &notification).await?;
                }
            }
        }

        debug!("stdin closed, shutting down");
        Ok(())
    }

    async fn handle_line(&self, line: &str) -> Value {
        let request: CommandRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "unparseable request line");
                return json!({"id": null, "success": false, "error": format!("invalid request: {}", e)});
            }
        };

        let id = request.id.clone();
        match self.dispatch(&request.method, request.params).await {
            Ok(result) => json!({"id": id, "success": true, "result": result}),
            Err(e) => json!({"id": id, "success": false, "error": e.to_string()}),
        }
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value> {
        match method {
            "initialize" => Ok(json!({
                "capabilities": self.manager.get_capabilities(),
            })),

            "tools/list" => {
                let tools = self.manager.get_tools();
                Ok(json!({"tools": tools, "count": tools.len()}))
            }

            "tools/list_by_type" => {
                let kind = match str_field(&params, "type")?.as_str() {
                    "local" => ToolKind::Local,
                    "remote" => ToolKind::Remote,
                    other => {
                        return Err(Error::validation(format!(
                            "unknown tool type '{}', expected local or remote",
                            other
                        )))
                    }
                };
                let tools = self.manager.get_tools_by_type(kind);
                Ok(json!({"tools": tools, "count": tools.len()}))
            }

            "tools/call" => {
                let name = str_field(&params, "name")?;
                let arguments = params
                    .get("arguments")
                    .cloned()
                    .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
                let result = self.manager.call_tool(&name, arguments).await?;
                Ok(serde_json::to_value(result)?)
            }

            "tools/refresh" => {
                let outcome = self.manager.refresh_remote_tools().await;
                Ok(serde_json::to_value(outcome)?)
            }

            "tools/stats" => Ok(serde_json::to_value(self.manager.get_tool_stats())?),

            "tools/configs" => {
                let configs = self.manager.get_tool_configurations().await;
                Ok(json!({"tools": configs, "count": configs.len()}))
            }

            "tools/set_enabled" => {
                let name = str_field(&params, "name")?;
                let enabled = params
                    .get("enabled")
                    .and_then(|v| v.as_bool())
                    .ok_or_else(|| Error::validation("missing boolean field 'enabled'"))?;
                self.manager.set_tool_enabled(&name, enabled).await?;
                Ok(json!({"name": name, "enabled": enabled}))
            }

            _ => Err(Error::not_found(format!("unknown method: {}", method))),
        }
    }
}

fn str_field(body: &Value, field: &str) -> Result<String> {
    body.get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| Error::validation(format!("missing string field '{}'", field)))
}

async fn write_line(stdout: &mut tokio::io::Stdout, value: &Value) -> Result<()> {
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    stdout.write_all(&line).await?;
    stdout.flush().await?;
    Ok(())
}
