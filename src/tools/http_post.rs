//! Generic HTTP POST proxy tool.

use crate::registry::{InputSchema, SchemaProperty, ToolDefinition};
use crate::types::Result;
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT_MS: u64 = 5000;

pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        "http_post",
        "Make HTTP POST requests to external APIs",
        InputSchema::object(
            [
                (
                    "url",
                    SchemaProperty::new("string", "The URL to send the POST request to"),
                ),
                (
                    "data",
                    SchemaProperty::new("object", "The JSON data to send in the request body"),
                ),
                (
                    "headers",
                    SchemaProperty::new("object", "Additional headers to include in the request")
                        .with_default(json!({})),
                ),
                (
                    "timeout",
                    SchemaProperty::new("number", "Request timeout in milliseconds")
                        .with_default(json!(DEFAULT_TIMEOUT_MS)),
                ),
            ],
            &["url", "data"],
        ),
        Arc::new(|params| Box::pin(handle(params))),
    )
}

async fn handle(params: Value) -> Result<Value> {
    let url = params["url"].as_str().unwrap_or_default().to_string();
    let data = params["data"].clone();
    let headers = params["headers"]
        .as_object()
        .cloned()
        .unwrap_or_else(Map::new);
    let timeout_ms = params["timeout"].as_u64().unwrap_or(DEFAULT_TIMEOUT_MS);

    let client = reqwest::Client::new();
    let mut request = client
        .post(&url)
        .timeout(Duration::from_millis(timeout_ms))
        .json(&data);
    for (name, value) in &headers {
        if let Some(value) = value.as_str() {
            request = request.header(name, value);
        }
    }

    // Upstream failures are part of this tool's result, not call failures.
    let response = match request.send().await {
        Ok(r) => r,
        Err(e) => {
            return Ok(json!({
                "success": false,
                "error": e.to_string(),
                "timestamp": Utc::now().to_rfc3339(),
            }))
        }
    };

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    Ok(json!({
        "success": status.is_success(),
        "status": status.as_u16(),
        "statusText": status.canonical_reason().unwrap_or(""),
        "data": body,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
