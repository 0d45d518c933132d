//! Backend discovery and the backend capability.
//!
//! Two interchangeable backends can provide compute: the agent backend
//! (bare-metal agents, namespace `agents`) and the pod backend (kubernetes
//! pods, namespace `pods`). Discovery probes the directory; [`select`] runs it
//! once at startup and yields the [`ResourceBackend`] injected into the router
//! and the pool resolver.

mod agent;
mod pod;

pub use agent::AgentBackend;
pub use pod::PodBackend;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::actor::{Address, Directory, Mailbox, AGENTS, PODS};
use crate::types::{Error, Result};

/// Which backend is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Agent,
    Pod,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Agent => write!(f, "agent"),
            BackendKind::Pod => write!(f, "pod"),
        }
    }
}

/// Capability of the active backend.
pub trait ResourceBackend: Send + Sync + fmt::Debug {
    fn kind(&self) -> BackendKind;

    /// Namespace root that logical paths are rooted at.
    fn namespace(&self) -> Address;

    /// Mailbox of a named resource pool, if this backend has one by that name.
    fn resolve_pool(&self, directory: &Directory, name: &str) -> Option<Mailbox>;

    /// Check a non-empty pool name against this backend.
    fn validate_pool(&self, directory: &Directory, name: &str) -> Result<()>;

    /// Map logical path segments (below the `agents` root) into this
    /// backend's namespace.
    fn address_for(&self, segments: &[&str]) -> Address {
        self.namespace().join(segments.iter().copied())
    }
}

/// Whether the agent backend is registered.
pub fn uses_agent_backend(directory: &Directory) -> bool {
    directory.contains(&Address::root(AGENTS))
}

/// Whether the pod backend is registered.
pub fn uses_pod_backend(directory: &Directory) -> bool {
    directory.contains(&Address::root(PODS))
}

/// Pick the active backend from directory state.
///
/// Returns `Ok(None)` when neither backend is registered; requests then fail
/// with [`Error::BackendAbsent`]. Both registered is a configuration error.
pub fn select(directory: &Directory) -> Result<Option<Arc<dyn ResourceBackend>>> {
    match (uses_agent_backend(directory), uses_pod_backend(directory)) {
        (true, true) => Err(Error::configuration(
            "both the agent and the pod backend are registered",
        )),
        (true, false) => {
            tracing::info!("Using the agent resource manager");
            Ok(Some(Arc::new(AgentBackend::new())))
        }
        (false, true) => {
            tracing::info!("Using the kubernetes resource manager");
            Ok(Some(Arc::new(PodBackend::new())))
        }
        (false, false) => {
            tracing::warn!("Neither the agent nor the pod backend is registered");
            Ok(None)
        }
    }
}
