//! Example post-creation tool backed by the JSONPlaceholder demo API.

use crate::registry::{
    InputSchema, ParamSpec, ParamType, SchemaProperty, StructuredSchema, ToolDefinition,
};
use crate::types::Result;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const POSTS_URL: &str = "https://jsonplaceholder.typicode.com/posts";

pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        "create_post",
        "Create a new post using JSONPlaceholder API (example API)",
        InputSchema::object(
            [
                ("title", SchemaProperty::new("string", "The title of the post")),
                (
                    "body",
                    SchemaProperty::new("string", "The body content of the post"),
                ),
                (
                    "userId",
                    SchemaProperty::new("number", "The user ID creating the post")
                        .with_default(json!(1)),
                ),
            ],
            &["title", "body"],
        ),
        Arc::new(|params| Box::pin(handle(params))),
    )
    .with_structured_schema(StructuredSchema::new(vec![
        ParamSpec::required("title", ParamType::String),
        ParamSpec::required("body", ParamType::String),
        ParamSpec::optional("userId", ParamType::Number),
    ]))
}

async fn handle(params: Value) -> Result<Value> {
    let payload = json!({
        "title": params["title"],
        "body": params["body"],
        "userId": params["userId"].as_u64().unwrap_or(1),
    });

    let client = reqwest::Client::new();
    let response = client
        .post(POSTS_URL)
        .timeout(Duration::from_secs(10))
        .json(&payload)
        .send()
        .await;

    match response {
        Ok(r) if r.status().is_success() => {
            let post: Value = r.json().await.unwrap_or(Value::Null);
            Ok(json!({
                "success": true,
                "post": post,
                "message": "Post created successfully",
                "timestamp": Utc::now().to_rfc3339(),
            }))
        }
        Ok(r) => Ok(json!({
            "success": false,
            "error": format!("status {}", r.status()),
            "timestamp": Utc::now().to_rfc3339(),
        })),
        Err(e) => Ok(json!({
            "success": false,
            "error": e.to_string(),
            "timestamp": Utc::now().to_rfc3339(),
        })),
    }
}
