//! Tool registry - definitions, parameter schemas, and the local tool set.

pub mod definition;
pub mod local;
pub mod schema;

pub use definition::{
    CombinedTool, RemoteToolDefinition, ToolDefinition, ToolExecutor, ToolKind, ToolResult,
    ToolSpec,
};
pub use local::LocalToolRegistry;
pub use schema::{InputSchema, ParamSpec, ParamType, SchemaProperty, StructuredSchema};
