//! Core types for the dispatch layer.
//!
//! This module provides foundational types used throughout the system:
//! - **IDs**: Strongly-typed identifiers (AgentId, SlotId, RequestId)
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for server, backends, and dispatch

mod config;
mod errors;
mod ids;

pub use config::{
    Config, DispatchConfig, IpcConfig, ObservabilityConfig, ResourceManagerConfig,
    ResourceManagerKind, ServerConfig,
};
pub use errors::{Error, Result};
pub use ids::{AgentId, RequestId, SlotId};
