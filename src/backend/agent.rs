//! Agent backend: bare-metal agents grouped into named resource pools.

use super::{BackendKind, ResourceBackend};
use crate::actor::{Address, Directory, Mailbox, AGENTS, AGENT_RM};
use crate::types::{Error, Result};

/// Resource pools are children of the agent resource manager.
#[derive(Debug, Default)]
pub struct AgentBackend;

impl AgentBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ResourceBackend for AgentBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Agent
    }

    fn namespace(&self) -> Address {
        Address::root(AGENTS)
    }

    fn resolve_pool(&self, directory: &Directory, name: &str) -> Option<Mailbox> {
        if !Address::is_segment(name) {
            return None;
        }
        directory.get(&Address::root(AGENT_RM).child(name)).cloned()
    }

    fn validate_pool(&self, directory: &Directory, name: &str) -> Result<()> {
        match self.resolve_pool(directory, name) {
            Some(_) => Ok(()),
            None => Err(Error::ResourcePoolNotFound(name.to_string())),
        }
    }
}
