//! Trivial echo tool, mostly useful for wiring checks.

use crate::registry::{
    InputSchema, ParamSpec, ParamType, SchemaProperty, StructuredSchema, ToolDefinition,
};
use serde_json::json;
use std::sync::Arc;

pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        "echo",
        "Echo a message back to the caller",
        InputSchema::object(
            [("msg", SchemaProperty::new("string", "The message to echo"))],
            &["msg"],
        ),
        Arc::new(|params| {
            Box::pin(async move { Ok(json!({"echoed": params["msg"].clone()})) })
        }),
    )
    .with_structured_schema(StructuredSchema::new(vec![ParamSpec::required(
        "msg",
        ParamType::String,
    )]))
}
