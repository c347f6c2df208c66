//! Local tool registry - the statically known, compiled-in tool set.
//!
//! Enumeration is infallible and registration order is preserved, because
//! the merged listing promises local-first insertion order.

use crate::registry::definition::ToolDefinition;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Ordered registry of local tool definitions.
#[derive(Debug, Default)]
pub struct LocalToolRegistry {
    order: Vec<String>,
    tools: HashMap<String, Arc<ToolDefinition>>,
}

impl LocalToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tools(tools: Vec<ToolDefinition>) -> Self {
        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool);
        }
        registry
    }

    /// Register a tool. A duplicate name overwrites the earlier definition.
    pub fn register(&mut self, tool: ToolDefinition) {
        let name = tool.name.clone();
        if self.tools.insert(name.clone(), Arc::new(tool)).is_some() {
            warn!(tool = %name, "local tool registered twice, keeping the later definition");
        } else {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ToolDefinition>> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Iterate definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ToolDefinition>> {
        self.order.iter().filter_map(|name| self.tools.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
