//! Configuration structures.
//!
//! Configuration is loaded from a YAML file; every section falls back to its
//! defaults when omitted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::Result;

/// Global configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Which backend to start and its pools.
    #[serde(default)]
    pub resource_manager: ResourceManagerConfig,

    /// Request dispatch settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// IPC transport configuration.
    #[serde(default)]
    pub ipc: IpcConfig,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    /// Parse configuration from a YAML document.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// IPC server bind address (TCP).
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:50061".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Backend flavour started at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResourceManagerKind {
    #[default]
    Agent,
    Kubernetes,
}

/// Resource manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceManagerConfig {
    #[serde(rename = "type")]
    pub kind: ResourceManagerKind,

    /// Pool answered for GetDefaultGpuPool.
    pub default_gpu_pool: String,

    /// Pool answered for GetDefaultCpuPool.
    pub default_cpu_pool: String,

    /// Named pools registered under the agent resource manager.
    /// Ignored by the kubernetes resource manager.
    pub resource_pools: Vec<String>,

    /// YAML file listing the agents (or pod nodes) served by the inventory.
    pub inventory: Option<PathBuf>,
}

impl Default for ResourceManagerConfig {
    fn default() -> Self {
        Self {
            kind: ResourceManagerKind::Agent,
            default_gpu_pool: "default".to_string(),
            default_cpu_pool: "default".to_string(),
            resource_pools: vec!["default".to_string()],
            inventory: None,
        }
    }
}

/// Request dispatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Deadline applied to every ask against a backend mailbox.
    #[serde(with = "humantime_serde")]
    pub ask_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            ask_timeout: Duration::from_secs(5),
        }
    }
}

/// IPC transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcConfig {
    /// Maximum frame payload size in bytes.
    pub max_frame_bytes: u32,

    /// Maximum concurrent TCP connections. Connections beyond this limit
    /// are dropped on accept.
    pub max_connections: usize,

    /// Read timeout in seconds per frame. Connections idle beyond this
    /// duration are dropped.
    pub read_timeout_secs: u64,

    /// Write timeout in seconds per frame.
    pub write_timeout_secs: u64,
}

impl Default for IpcConfig {
    fn default() -> Self {
        Self {
            max_frame_bytes: 5 * 1024 * 1024,
            max_connections: 1000,
            read_timeout_secs: 30,
            write_timeout_secs: 10,
        }
    }
}
