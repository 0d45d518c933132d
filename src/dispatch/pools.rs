//! Resource pool resolution.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::actor::{ask, Address, Directory, Mailbox, AGENT_RM, RESOURCE_MANAGERS};
use crate::backend::{BackendKind, ResourceBackend};
use crate::messages::{
    GetDefaultCpuPoolRequest, GetDefaultCpuPoolResponse, GetDefaultGpuPoolRequest,
    GetDefaultGpuPoolResponse,
};
use crate::types::{Error, Result};

/// Which default pool to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolKind {
    Gpu,
    Cpu,
}

/// Resolves named and default resource pools.
#[derive(Debug, Clone)]
pub struct PoolResolver {
    directory: Arc<Directory>,
    backend: Option<Arc<dyn ResourceBackend>>,
    ask_timeout: Duration,
}

impl PoolResolver {
    pub fn new(
        directory: Arc<Directory>,
        backend: Option<Arc<dyn ResourceBackend>>,
        ask_timeout: Duration,
    ) -> Self {
        Self {
            directory,
            backend,
            ask_timeout,
        }
    }

    /// Ask the resource manager router for its default pool of `kind`.
    pub async fn default_pool(&self, kind: PoolKind) -> Result<String> {
        if self.backend.is_none() {
            return Err(Error::BackendAbsent);
        }

        let address = Address::root(RESOURCE_MANAGERS);
        let rm = self
            .directory
            .get(&address)
            .ok_or_else(|| Error::not_found(format!("no resource manager at {}", address)))?;

        let pool_name = match kind {
            PoolKind::Gpu => {
                let resp: GetDefaultGpuPoolResponse =
                    ask(rm, address, GetDefaultGpuPoolRequest, self.ask_timeout).await?;
                resp.pool_name
            }
            PoolKind::Cpu => {
                let resp: GetDefaultCpuPoolResponse =
                    ask(rm, address, GetDefaultCpuPoolRequest, self.ask_timeout).await?;
                resp.pool_name
            }
        };

        tracing::debug!("Default {:?} pool is {:?}", kind, pool_name);
        Ok(pool_name)
    }

    /// Mailbox of the named pool. Only the agent backend has named pools.
    pub fn resolve_pool(&self, name: &str) -> Option<Mailbox> {
        self.backend
            .as_ref()
            .and_then(|backend| backend.resolve_pool(&self.directory, name))
    }

    /// Check a requested pool name.
    ///
    /// The empty name means "use the default" and is always valid.
    pub fn validate_pool(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Ok(());
        }
        match &self.backend {
            Some(backend) => backend.validate_pool(&self.directory, name),
            None => Err(Error::ResourcePoolNotFound(name.to_string())),
        }
    }

    /// Names of the registered pools, sorted. Empty under the pod backend.
    pub fn pool_names(&self) -> Vec<String> {
        match self.backend.as_ref().map(|b| b.kind()) {
            Some(BackendKind::Agent) => self
                .directory
                .children(&Address::root(AGENT_RM))
                .into_iter()
                .filter_map(|addr| addr.segments().last().map(String::from))
                .collect(),
            Some(BackendKind::Pod) | None => Vec::new(),
        }
    }
}
