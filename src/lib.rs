//! # Toolgate - Tool-Calling Gateway
//!
//! A gateway exposing a registry of callable tools through a stdio command
//! surface:
//! - Local tools: compiled-in async executors with declared schemas
//! - Remote tools: fetched from a configured HTTP endpoint and executed by
//!   delegated HTTP calls, with bounded retries and safe hot reload
//! - Per-tool enable/disable state persisted across restarts (fail closed)
//! - Parameter validation with a structured-validator fallback chain
//!
//! ## Architecture
//!
//! The [`manager::ToolManager`] owns all registry state:
//! ```text
//!                  ┌──────────────────────────────────┐
//!  transport  ───► │           ToolManager            │
//!  (stdio)         │  ┌────────┐ ┌────────┐           │
//!                  │  │ Local  │ │ Remote │  merge +  │
//!                  │  │Registry│ │ Loader │  override │
//!                  │  └────────┘ └────────┘           │
//!                  │  ┌────────────┐ ┌─────────────┐  │
//!                  │  │ConfigStore │ │ MergedView  │  │
//!                  │  │ (on disk)  │ │ (snapshot)  │  │
//!                  │  └────────────┘ └─────────────┘  │
//!                  └──────────────────────────────────┘
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod config_store;
pub mod manager;
pub mod registry;
pub mod remote;
pub mod stdio;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;

pub use types::{Config, Error, RemoteApiConfig, Result};
