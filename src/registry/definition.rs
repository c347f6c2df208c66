//! Tool definitions - the passive records behind every callable capability.
//!
//! Local tools own an in-process async executor; remote tools carry the
//! address their execution is delegated to. The two kinds share one name
//! space and are combined into an explicit tagged union at merge time.

use crate::registry::schema::{InputSchema, StructuredSchema};
use crate::types::Result;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Asynchronous in-process tool body: `parameters -> result`.
pub type ToolExecutor = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// A locally compiled-in tool.
#[derive(Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
    /// Stricter validator, used preferentially over [`InputSchema`] checks.
    pub structured_schema: Option<StructuredSchema>,
    pub executor: ToolExecutor,
}

impl ToolDefinition {
    pub fn new(
        name: &str,
        description: &str,
        input_schema: InputSchema,
        executor: ToolExecutor,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
            structured_schema: None,
            executor,
        }
    }

    pub fn with_structured_schema(mut self, schema: StructuredSchema) -> Self {
        self.structured_schema = Some(schema);
        self
    }
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .field("structured_schema", &self.structured_schema)
            .finish_non_exhaustive()
    }
}

/// A tool fetched from the remote registry endpoint.
///
/// No in-process code runs for its body; execution means POSTing to
/// `execute_url`. Field names follow the remote endpoint's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
    pub execute_url: String,

    /// HTTP method for the execution call; POST when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Extra headers sent with the execution call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,

    /// Execution timeout in milliseconds; 10 000 when omitted.
    #[serde(rename = "timeout", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Source of a tool in the merged registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Local,
    Remote,
}

/// Tagged union of the two tool kinds, pattern-matched at dispatch time.
#[derive(Debug, Clone)]
pub enum CombinedTool {
    Local(Arc<ToolDefinition>),
    Remote(Arc<RemoteToolDefinition>),
}

impl CombinedTool {
    pub fn name(&self) -> &str {
        match self {
            CombinedTool::Local(t) => &t.name,
            CombinedTool::Remote(t) => &t.name,
        }
    }

    pub fn structured_schema(&self) -> Option<&StructuredSchema> {
        match self {
            CombinedTool::Local(t) => t.structured_schema.as_ref(),
            CombinedTool::Remote(_) => None,
        }
    }

    pub fn input_schema(&self) -> &InputSchema {
        match self {
            CombinedTool::Local(t) => &t.input_schema,
            CombinedTool::Remote(t) => &t.input_schema,
        }
    }

    /// Listing record for this tool.
    pub fn spec(&self) -> ToolSpec {
        match self {
            CombinedTool::Local(t) => ToolSpec {
                name: t.name.clone(),
                description: t.description.clone(),
                input_schema: t.input_schema.clone(),
            },
            CombinedTool::Remote(t) => ToolSpec {
                name: t.name.clone(),
                description: t.description.clone(),
                input_schema: t.input_schema.clone(),
            },
        }
    }
}

/// What callers see when listing tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
}

/// Uniform result envelope returned by every successful call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub tool: String,
    pub result: Value,
    /// RFC3339 timestamp of when the call completed.
    pub executed_at: String,
}

impl ToolResult {
    pub fn new(tool: impl Into<String>, result: Value) -> Self {
        Self {
            tool: tool.into(),
            result,
            executed_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
