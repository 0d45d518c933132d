//! # rm-core - Resource Manager Dispatch Layer
//!
//! Routes agent, slot, and resource-pool queries from an RPC surface to
//! whichever compute backend is running:
//! - Typed mailboxes and a deadline-bounded ask helper
//! - Immutable address directory built once at startup
//! - Backend selection between bare-metal agents and kubernetes pods
//! - Resource pool validation and default pool lookup
//! - Uniform filter → sort → paginate pipeline for list replies
//! - TCP+msgpack IPC surface for external clients
//!
//! ## Architecture
//!
//! ```text
//!                  ┌──────────────────────────────────────────────┐
//!  IPC requests →  │ ApiServer                                    │
//!                  │  ┌────────┐  ┌──────────────┐  ┌──────────┐  │
//!                  │  │ Router │  │ PoolResolver │  │ Listing  │  │
//!                  │  └───┬────┘  └──────┬───────┘  └──────────┘  │
//!                  └──────┼──────────────┼────────────────────────┘
//!                         │ ask          │ ask
//!                  ┌──────▼──────────────▼───────┐
//!                  │ Directory (immutable)       │
//!                  │  /agents | /pods            │
//!                  │  /resourceManagers          │
//!                  │  /agentRM/{pool}            │
//!                  └─────────────────────────────┘
//! ```

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod actor;
pub mod api;
pub mod backend;
pub mod cluster;
pub mod dispatch;
pub mod ipc;
pub mod listing;
pub mod messages;
pub mod observability;
pub mod types;

pub use api::ApiServer;
pub use types::{Config, Error, Result};
