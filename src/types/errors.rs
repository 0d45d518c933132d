//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and carry a
//! machine-readable kind through [`Error::to_ipc_error_code`].

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the resource-manager dispatch layer.
#[derive(Error, Debug)]
pub enum Error {
    /// Neither the agent nor the pod backend is registered (NOT_FOUND).
    #[error("cannot find agents or pods actor")]
    BackendAbsent,

    /// Agent, slot, or address not found (NOT_FOUND).
    #[error("not found: {0}")]
    NotFound(String),

    /// Named pool does not resolve under the active backend (INVALID_ARGUMENT).
    #[error("cannot find resource pool: {0}")]
    ResourcePoolNotFound(String),

    /// Non-empty pool name while the pod backend is active (INVALID_ARGUMENT).
    #[error("resource pool {0} is not supported by the kubernetes resource manager")]
    ResourcePoolUnsupported(String),

    /// Validation errors (INVALID_ARGUMENT).
    #[error("validation error: {0}")]
    Validation(String),

    /// Startup misconfiguration, e.g. both backends registered (FAILED_PRECONDITION).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Target mailbox is closed or dropped the reply (UNAVAILABLE).
    #[error("mailbox unreachable: {0}")]
    Unreachable(String),

    /// Ask deadline elapsed (DEADLINE_EXCEEDED).
    #[error("timeout: {0}")]
    Timeout(String),

    /// Internal errors (INTERNAL).
    #[error("internal error: {0}")]
    Internal(String),

    /// Malformed request body (INVALID_ARGUMENT).
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Config file parse errors.
    #[error("config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Machine-readable error code sent to IPC clients.
    pub fn to_ipc_error_code(&self) -> &'static str {
        match self {
            Error::BackendAbsent | Error::NotFound(_) => "NOT_FOUND",
            Error::ResourcePoolNotFound(_)
            | Error::ResourcePoolUnsupported(_)
            | Error::Validation(_)
            | Error::Serialization(_) => "INVALID_ARGUMENT",
            Error::Configuration(_) => "FAILED_PRECONDITION",
            Error::Unreachable(_) => "UNAVAILABLE",
            Error::Timeout(_) => "DEADLINE_EXCEEDED",
            Error::Internal(_) | Error::Yaml(_) | Error::Io(_) => "INTERNAL",
        }
    }
}

// Convenience constructors
impl Error {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::Unreachable(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
