//! Service handlers, one module per IPC service.

pub mod agents;
pub mod resource_pools;
