//! Resource manager queries.

use serde::{Deserialize, Serialize};

/// Asks the resource manager for its default GPU pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GetDefaultGpuPoolRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetDefaultGpuPoolResponse {
    pub pool_name: String,
}

/// Asks the resource manager for its default CPU pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GetDefaultCpuPoolRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetDefaultCpuPoolResponse {
    pub pool_name: String,
}
