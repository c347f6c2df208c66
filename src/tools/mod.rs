//! Built-in local tools - thin wrappers over external HTTP APIs and mock
//! data generators. All the interesting logic lives in the manager; these
//! stay deliberately small.

pub mod create_post;
pub mod echo;
pub mod http_post;
pub mod weather;

use crate::registry::ToolDefinition;

/// The statically known local tool set.
pub fn builtin_tools() -> Vec<ToolDefinition> {
    vec![
        weather::definition(),
        http_post::definition(),
        create_post::definition(),
        echo::definition(),
    ]
}
