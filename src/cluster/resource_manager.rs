//! Resource manager and resource pool actors.

use async_trait::async_trait;

use crate::actor::{Address, Handler, Reply};
use crate::messages::{GetDefaultCpuPoolResponse, GetDefaultGpuPoolResponse, Request};
use crate::types::Error;

/// Answers default-pool queries. Runs at `resourceManagers` and at the
/// backend-specific manager address.
#[derive(Debug, Clone)]
pub struct ResourceManagerActor {
    default_gpu_pool: String,
    default_cpu_pool: String,
}

impl ResourceManagerActor {
    pub fn new(default_gpu_pool: impl Into<String>, default_cpu_pool: impl Into<String>) -> Self {
        Self {
            default_gpu_pool: default_gpu_pool.into(),
            default_cpu_pool: default_cpu_pool.into(),
        }
    }
}

#[async_trait]
impl Handler for ResourceManagerActor {
    async fn handle(&mut self, target: &Address, request: Request) -> Reply {
        match request {
            Request::GetDefaultGpuPool(_) => Ok(GetDefaultGpuPoolResponse {
                pool_name: self.default_gpu_pool.clone(),
            }
            .into()),
            Request::GetDefaultCpuPool(_) => Ok(GetDefaultCpuPoolResponse {
                pool_name: self.default_cpu_pool.clone(),
            }
            .into()),
            other => Err(Error::validation(format!(
                "{} is not supported at {}",
                other.kind(),
                target
            ))),
        }
    }
}

/// Named resource pool under the agent resource manager.
///
/// Pools own scheduling for their agents; this layer only needs them to exist
/// so names can be validated, so every query is rejected.
#[derive(Debug, Clone)]
pub struct PoolActor {
    name: String,
}

impl PoolActor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Handler for PoolActor {
    async fn handle(&mut self, _target: &Address, request: Request) -> Reply {
        Err(Error::validation(format!(
            "{} is not supported by resource pool {}",
            request.kind(),
            self.name
        )))
    }
}
