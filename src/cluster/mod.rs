//! In-process cluster: the backend actors behind the directory.
//!
//! [`start`] spawns the actors for the configured resource manager and
//! publishes their mailboxes in one immutable [`Directory`]:
//!
//! | kind | addresses |
//! |---|---|
//! | agent | `/resourceManagers`, `/agentRM`, `/agentRM/{pool}`, `/agents` |
//! | kubernetes | `/resourceManagers`, `/kubernetesRM`, `/pods` |

mod inventory;
mod resource_manager;

pub use inventory::InventoryActor;
pub use resource_manager::{PoolActor, ResourceManagerActor};

use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::actor::{
    spawn, Address, Directory, DirectoryBuilder, AGENTS, AGENT_RM, KUBERNETES_RM, PODS,
    RESOURCE_MANAGERS,
};
use crate::backend::BackendKind;
use crate::messages::Agent;
use crate::types::{Error, ResourceManagerConfig, ResourceManagerKind, Result};

/// Running backend actors and the directory that reaches them.
#[derive(Debug)]
pub struct Cluster {
    directory: Arc<Directory>,
    handles: Vec<JoinHandle<()>>,
}

impl Cluster {
    pub fn directory(&self) -> Arc<Directory> {
        Arc::clone(&self.directory)
    }

    /// Stop every actor task.
    pub async fn shutdown(self) {
        for handle in &self.handles {
            handle.abort();
        }
        for handle in self.handles {
            let _ = handle.await;
        }
        tracing::info!("Cluster stopped");
    }
}

#[derive(Debug, Deserialize)]
struct InventoryFile {
    #[serde(default)]
    agents: Vec<Agent>,
}

/// Read the agent inventory from a YAML file with a top-level `agents` list.
pub fn load_inventory(path: impl AsRef<Path>) -> Result<Vec<Agent>> {
    let raw = std::fs::read_to_string(path)?;
    let file: InventoryFile = serde_yaml::from_str(&raw)?;
    Ok(file.agents)
}

/// Spawn the actors for `config` and build the directory.
///
/// Must be called from within a tokio runtime.
pub fn start(config: &ResourceManagerConfig, agents: Vec<Agent>) -> Result<Cluster> {
    let mut builder = DirectoryBuilder::new();
    let mut handles = Vec::new();

    let manager =
        ResourceManagerActor::new(&config.default_gpu_pool, &config.default_cpu_pool);
    let (mailbox, handle) = spawn(Address::root(RESOURCE_MANAGERS), manager.clone());
    builder.register(mailbox)?;
    handles.push(handle);

    match config.kind {
        ResourceManagerKind::Agent => {
            let rm_address = Address::root(AGENT_RM);
            let (mailbox, handle) = spawn(rm_address.clone(), manager);
            builder.register(mailbox)?;
            handles.push(handle);

            for pool in &config.resource_pools {
                if !Address::is_segment(pool) {
                    return Err(Error::configuration(format!(
                        "invalid resource pool name: {:?}",
                        pool
                    )));
                }
                let (mailbox, handle) = spawn(rm_address.child(pool), PoolActor::new(pool));
                builder.register(mailbox)?;
                handles.push(handle);
            }

            let root = Address::root(AGENTS);
            let inventory = InventoryActor::new(BackendKind::Agent, root.clone(), agents);
            let (mailbox, handle) = spawn(root, inventory);
            builder.register(mailbox)?;
            handles.push(handle);
        }
        ResourceManagerKind::Kubernetes => {
            let (mailbox, handle) = spawn(Address::root(KUBERNETES_RM), manager);
            builder.register(mailbox)?;
            handles.push(handle);

            let root = Address::root(PODS);
            let inventory = InventoryActor::new(BackendKind::Pod, root.clone(), agents);
            let (mailbox, handle) = spawn(root, inventory);
            builder.register(mailbox)?;
            handles.push(handle);
        }
    }

    let directory = builder.build();
    tracing::info!(
        "Started {:?} resource manager with {} mailboxes",
        config.kind,
        directory.len()
    );

    Ok(Cluster {
        directory: Arc::new(directory),
        handles,
    })
}
