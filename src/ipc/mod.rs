//! TCP+msgpack IPC transport layer.
//!
//! Length-prefixed msgpack frames carrying `{id, service, method, body}`
//! requests. Two services are exposed: `agents` and `resource_pools`.

pub mod codec;
pub mod dispatch;
pub mod handlers;
pub mod server;

pub use server::IpcServer;
