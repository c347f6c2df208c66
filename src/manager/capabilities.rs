//! Capability descriptor advertised once per transport session.

use serde::{Deserialize, Serialize};

/// Which protocol features the manager supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub tools: ToolsCapability,
    pub resources: FeatureCapability,
    pub prompts: FeatureCapability,
    pub logging: FeatureCapability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    pub supported: bool,
    /// Whether the visible tool set can change at runtime.
    pub list_changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureCapability {
    pub supported: bool,
}

/// Pure function of manager configuration: tools are always supported and
/// the list can change at runtime exactly when remote loading is enabled;
/// resources and prompts are never supported; logging always is.
pub fn capabilities(remote_enabled: bool) -> Capabilities {
    Capabilities {
        tools: ToolsCapability {
            supported: true,
            list_changed: remote_enabled,
        },
        resources: FeatureCapability { supported: false },
        prompts: FeatureCapability { supported: false },
        logging: FeatureCapability { supported: true },
    }
}
