//! Tool manager - the single authoritative entry point for listing and
//! invoking tools, and for orchestrating safe reload of the remote subset.
//!
//! The manager owns all registry state as an explicit instance with
//! lifecycle `construct -> initialize -> [serve calls | refresh] -> drop`.
//! Mutating operations (`initialize`, `refresh_remote_tools`,
//! `set_tool_enabled`) serialize through one async mutex; readers take an
//! `Arc` snapshot of an immutable merged view that is swapped wholesale
//! after every rebuild, so an in-flight call sees either the pre- or
//! post-refresh view, never a partially populated one.

pub mod capabilities;

pub use capabilities::{Capabilities, FeatureCapability, ToolsCapability};

use crate::config_store::{ToolConfigEntry, ToolConfigStore};
use crate::registry::schema::validate_parameters;
use crate::registry::{
    CombinedTool, InputSchema, LocalToolRegistry, RemoteToolDefinition, ToolDefinition, ToolKind,
    ToolResult, ToolSpec,
};
use crate::remote::RemoteToolLoader;
use crate::types::{Config, Error, RemoteApiConfig, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex as StdMutex, RwLock};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Built-in tool exposed when remote loading is enabled.
pub const REFRESH_TOOL_NAME: &str = "refresh_remote_tools";

/// Counts for observability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolStats {
    /// Merged registry size, before the enablement filter.
    pub total: usize,
    pub local: usize,
    pub remote: usize,
    pub remote_api_enabled: bool,
}

/// Observable outcome of a remote refresh. Load failure degrades to an
/// empty remote set and is reported here rather than raised.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshOutcome {
    pub success: bool,
    pub remote_tools: usize,
    pub total_tools: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

type ToolsChangedCallback = Box<dyn Fn() + Send + Sync>;

/// Immutable snapshot of the merged registry plus the enablement filter.
#[derive(Debug, Default)]
struct MergedView {
    /// Merge insertion order: local first, then remote.
    order: Vec<String>,
    tools: HashMap<String, CombinedTool>,
    enabled: HashSet<String>,
    /// Per-source listings; a shadowed local tool still shows up here.
    local_specs: Vec<ToolSpec>,
    remote_specs: Vec<ToolSpec>,
}

/// Mutable state guarded by the single-flight mutex.
struct ManagerInner {
    local: LocalToolRegistry,
    remote_order: Vec<String>,
    remote: HashMap<String, Arc<RemoteToolDefinition>>,
    config_store: ToolConfigStore,
}

impl ManagerInner {
    fn known_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.local.names().map(|s| s.to_string()).collect();
        for name in &self.remote_order {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    fn build_view(&self) -> MergedView {
        let mut view = MergedView::default();

        for tool in self.local.iter() {
            let combined = CombinedTool::Local(tool.clone());
            let name = combined.name().to_string();
            view.order.push(name.clone());
            view.local_specs.push(combined.spec());
            view.tools.insert(name, combined);
        }

        // Remote tools override local ones with the same name, deliberately.
        for name in &self.remote_order {
            let Some(tool) = self.remote.get(name) else {
                continue;
            };
            let combined = CombinedTool::Remote(tool.clone());
            if view.tools.contains_key(combined.name()) {
                warn!(tool = %name, "remote tool is overriding local tool with same name");
            } else {
                view.order.push(name.clone());
            }
            view.remote_specs.push(combined.spec());
            view.tools.insert(name.clone(), combined);
        }

        view.enabled = self
            .config_store
            .enabled_names()
            .map(str::to_string)
            .collect();

        view
    }
}

/// The dispatch core. See the module docs for the concurrency model.
pub struct ToolManager {
    remote_config: RemoteApiConfig,
    loader: RemoteToolLoader,
    inner: Mutex<ManagerInner>,
    view: RwLock<Arc<MergedView>>,
    on_tools_changed: StdMutex<Option<ToolsChangedCallback>>,
}

impl std::fmt::Debug for ToolManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolManager")
            .field("remote_config", &self.remote_config)
            .finish_non_exhaustive()
    }
}

impl ToolManager {
    /// Construct a manager around the given local tool set.
    ///
    /// Nothing is loaded or persisted until [`initialize`](Self::initialize);
    /// listing or calling before that sees an empty view, never a crash.
    pub fn with_local_tools(local_tools: Vec<ToolDefinition>, config: Config) -> Self {
        Self {
            loader: RemoteToolLoader::new(config.remote.clone()),
            remote_config: config.remote,
            inner: Mutex::new(ManagerInner {
                local: LocalToolRegistry::from_tools(local_tools),
                remote_order: Vec::new(),
                remote: HashMap::new(),
                config_store: ToolConfigStore::new(config.tool_config.path),
            }),
            view: RwLock::new(Arc::new(MergedView::default())),
            on_tools_changed: StdMutex::new(None),
        }
    }

    /// Register a no-arg callback invoked whenever the visible tool set
    /// changes (remote refresh, enable/disable).
    pub fn set_on_tools_changed(&self, callback: impl Fn() + Send + Sync + 'static) {
        *self.on_tools_changed.lock().expect("callback lock poisoned") = Some(Box::new(callback));
    }

    /// Load local tools, attempt the remote load when enabled (failure is
    /// non-fatal), reconcile the config store against the full name set,
    /// and publish the merged enabled-only view.
    pub async fn initialize(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;

        if self.remote_config.enabled {
            match self.loader.fetch_tools().await {
                Ok(tools) => Self::replace_remote(&mut inner, tools),
                Err(e) => {
                    warn!(error = %e, "proceeding without remote tools");
                }
            }
        }

        let known = inner.known_names();
        inner.config_store.initialize(&known)?;
        inner.config_store.reconcile(&known)?;

        let view = self.publish(&inner);
        info!(
            total = view.tools.len(),
            local = view.local_specs.len(),
            remote = view.remote_specs.len(),
            enabled = view.enabled.len(),
            "tool manager initialized"
        );
        Ok(())
    }

    /// Clear and reload the remote registry, reconcile the config store,
    /// swap the merged view atomically, and notify observers exactly once.
    ///
    /// No-op when remote loading is disabled. Never fails: load exhaustion
    /// leaves the remote set empty and is reported in the outcome.
    pub async fn refresh_remote_tools(&self) -> RefreshOutcome {
        if !self.remote_config.enabled {
            let view = self.snapshot();
            return RefreshOutcome {
                success: true,
                remote_tools: 0,
                total_tools: view.tools.len(),
                error: None,
            };
        }

        let mut inner = self.inner.lock().await;

        inner.remote_order.clear();
        inner.remote.clear();

        let error = match self.loader.fetch_tools().await {
            Ok(tools) => {
                Self::replace_remote(&mut inner, tools);
                None
            }
            Err(e) => {
                warn!(error = %e, "remote refresh failed, remote set left empty");
                Some(e.to_string())
            }
        };

        let known = inner.known_names();
        if let Err(e) = inner.config_store.reconcile(&known) {
            warn!(error = %e, "failed to persist reconciled tool configuration");
        }

        let view = self.publish(&inner);
        let outcome = RefreshOutcome {
            success: error.is_none(),
            remote_tools: view.remote_specs.len(),
            total_tools: view.tools.len(),
            error,
        };
        drop(inner);

        self.notify_tools_changed();
        outcome
    }

    /// Listing records for every enabled tool, merge insertion order
    /// (local first, then remote). Includes the built-in refresh tool when
    /// remote loading is enabled.
    pub fn get_tools(&self) -> Vec<ToolSpec> {
        let view = self.snapshot();
        let mut specs: Vec<ToolSpec> = view
            .order
            .iter()
            .filter(|name| view.enabled.contains(*name))
            .filter_map(|name| view.tools.get(name))
            .map(|tool| tool.spec())
            .collect();

        if self.remote_config.enabled {
            specs.push(refresh_tool_spec());
        }
        specs
    }

    /// Same enablement filter, restricted to one source map. A local tool
    /// shadowed by a remote one still shows up in the local listing.
    pub fn get_tools_by_type(&self, kind: ToolKind) -> Vec<ToolSpec> {
        let view = self.snapshot();
        let specs = match kind {
            ToolKind::Local => &view.local_specs,
            ToolKind::Remote => &view.remote_specs,
        };
        specs
            .iter()
            .filter(|spec| view.enabled.contains(&spec.name))
            .cloned()
            .collect()
    }

    /// Invoke a tool: resolve, enablement check, validation, dispatch,
    /// envelope. Per-call failures come back as typed errors; the raw
    /// executor or transport error never escapes unwrapped.
    pub async fn call_tool(&self, name: &str, parameters: Value) -> Result<ToolResult> {
        if name == REFRESH_TOOL_NAME && self.remote_config.enabled {
            let outcome = self.refresh_remote_tools().await;
            return Ok(ToolResult::new(name, serde_json::to_value(outcome)?));
        }

        let tool = {
            let view = self.snapshot();
            let tool = view
                .tools
                .get(name)
                .ok_or_else(|| Error::not_found(name.to_string()))?;
            if !view.enabled.contains(name) {
                return Err(Error::disabled(name.to_string()));
            }
            tool.clone()
        };

        validate_parameters(tool.structured_schema(), tool.input_schema(), &parameters)?;

        let output = match &tool {
            CombinedTool::Local(def) => {
                (def.executor)(parameters).await.map_err(|e| match e {
                    Error::Execution(msg) => Error::Execution(msg),
                    other => Error::execution(other.to_string()),
                })?
            }
            CombinedTool::Remote(def) => self.loader.execute(def, &parameters).await?,
        };

        Ok(ToolResult::new(name, output))
    }

    /// Enable or disable a tool, write-through. Unknown names are rejected
    /// before the store is touched.
    pub async fn set_tool_enabled(&self, name: &str, enabled: bool) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if !inner.local.contains(name) && !inner.remote.contains_key(name) {
            return Err(Error::not_found(name.to_string()));
        }
        inner.config_store.set_enabled(name, enabled)?;
        self.publish(&inner);
        drop(inner);

        self.notify_tools_changed();
        Ok(())
    }

    /// The persisted enable/disable entries, in file order.
    pub async fn get_tool_configurations(&self) -> Vec<ToolConfigEntry> {
        self.inner.lock().await.config_store.entries().to_vec()
    }

    pub fn get_tool_stats(&self) -> ToolStats {
        let view = self.snapshot();
        ToolStats {
            total: view.tools.len(),
            local: view.local_specs.len(),
            remote: view.remote_specs.len(),
            remote_api_enabled: self.remote_config.enabled,
        }
    }

    pub fn get_capabilities(&self) -> Capabilities {
        capabilities::capabilities(self.remote_config.enabled)
    }

    fn snapshot(&self) -> Arc<MergedView> {
        self.view.read().expect("view lock poisoned").clone()
    }

    /// Rebuild the merged view from `inner` and swap it in wholesale.
    fn publish(&self, inner: &ManagerInner) -> Arc<MergedView> {
        let view = Arc::new(inner.build_view());
        *self.view.write().expect("view lock poisoned") = view.clone();
        view
    }

    fn replace_remote(inner: &mut ManagerInner, tools: Vec<RemoteToolDefinition>) {
        for tool in tools {
            let name = tool.name.clone();
            if inner.remote.insert(name.clone(), Arc::new(tool)).is_none() {
                inner.remote_order.push(name);
            }
        }
    }

    fn notify_tools_changed(&self) {
        if let Some(callback) = self
            .on_tools_changed
            .lock()
            .expect("callback lock poisoned")
            .as_ref()
        {
            callback();
        }
    }
}

fn refresh_tool_spec() -> ToolSpec {
    ToolSpec {
        name: REFRESH_TOOL_NAME.to_string(),
        description: "Refresh and reload remote tools from the configured API endpoint"
            .to_string(),
        input_schema: InputSchema::object([], &[]),
    }
}
