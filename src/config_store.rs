//! Persisted per-tool enable/disable state.
//!
//! A flat ordered list of `{toolName, enabled}` records in a human-readable
//! JSON file, safe to hand-edit between runs. New tools enter disabled
//! (fail closed), stale names are dropped at reconciliation, and every
//! mutation is written through immediately. Writes go to a temp file that
//! is renamed into place so a crash mid-write never corrupts the previous
//! good state.

use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfigEntry {
    pub tool_name: String,
    pub enabled: bool,
}

/// Durable enable/disable state per tool name.
#[derive(Debug)]
pub struct ToolConfigStore {
    path: PathBuf,
    entries: Vec<ToolConfigEntry>,
}

impl ToolConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    /// Load the persisted mapping, or create defaults (everything disabled)
    /// if the file is absent or unreadable.
    ///
    /// An unreadable file is recovered locally by regenerating defaults; the
    /// failure is logged but never surfaced to the caller.
    pub fn initialize(&mut self, known_names: &[String]) -> Result<()> {
        match self.load() {
            Ok(entries) => {
                info!(count = entries.len(), path = %self.path.display(), "loaded tool configuration");
                self.entries = entries;
                Ok(())
            }
            Err(e) => {
                if self.path.exists() {
                    warn!(error = %e, "tool configuration unreadable, regenerating defaults");
                } else {
                    info!("creating default tool configuration with all tools disabled");
                }
                self.entries = known_names
                    .iter()
                    .map(|name| ToolConfigEntry {
                        tool_name: name.clone(),
                        enabled: false,
                    })
                    .collect();
                self.save()
            }
        }
    }

    fn load(&self) -> Result<Vec<ToolConfigEntry>> {
        let data = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::config_load(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_str(&data)
            .map_err(|e| Error::config_load(format!("{}: {}", self.path.display(), e)))
    }

    /// Add disabled entries for untracked names, drop names no longer known.
    /// Persists only when something changed.
    pub fn reconcile(&mut self, known_names: &[String]) -> Result<bool> {
        let mut changed = false;

        let before = self.entries.len();
        self.entries
            .retain(|entry| known_names.contains(&entry.tool_name));
        changed |= self.entries.len() != before;

        for name in known_names {
            if !self.entries.iter().any(|e| &e.tool_name == name) {
                self.entries.push(ToolConfigEntry {
                    tool_name: name.clone(),
                    enabled: false,
                });
                changed = true;
            }
        }

        if changed {
            self.save()?;
            info!("tool configuration reconciled against current tool set");
        }
        Ok(changed)
    }

    /// The tracked flag, or `false` for names never tracked (fail closed).
    pub fn is_enabled(&self, name: &str) -> bool {
        self.entries
            .iter()
            .find(|e| e.tool_name == name)
            .map(|e| e.enabled)
            .unwrap_or(false)
    }

    /// Mutate and persist write-through. Tracks the name if it was unknown;
    /// the manager is responsible for rejecting non-existent tools first.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        match self.entries.iter_mut().find(|e| e.tool_name == name) {
            Some(entry) => entry.enabled = enabled,
            None => self.entries.push(ToolConfigEntry {
                tool_name: name.to_string(),
                enabled,
            }),
        }
        self.save()
    }

    pub fn entries(&self) -> &[ToolConfigEntry] {
        &self.entries
    }

    pub fn enabled_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.tool_name.as_str())
    }

    fn save(&self) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.entries)?;
        let tmp = temp_path(&self.path);
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
