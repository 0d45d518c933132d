//! Pod backend: kubernetes pods, no named pools.

use super::{BackendKind, ResourceBackend};
use crate::actor::{Address, Directory, Mailbox, PODS};
use crate::types::{Error, Result};

#[derive(Debug, Default)]
pub struct PodBackend;

impl PodBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ResourceBackend for PodBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Pod
    }

    fn namespace(&self) -> Address {
        Address::root(PODS)
    }

    fn resolve_pool(&self, _directory: &Directory, _name: &str) -> Option<Mailbox> {
        None
    }

    fn validate_pool(&self, _directory: &Directory, name: &str) -> Result<()> {
        Err(Error::ResourcePoolUnsupported(name.to_string()))
    }
}
