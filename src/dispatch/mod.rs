//! Query dispatch: request routing and resource pool resolution.
//!
//! Both components share the immutable directory and the backend selected at
//! startup, and reach backends only through the deadline-bounded ask.

mod pools;
mod router;

pub use pools::{PoolKind, PoolResolver};
pub use router::{LogicalPath, Router};
