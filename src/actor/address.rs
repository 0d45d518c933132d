//! Hierarchical mailbox addresses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource manager router: answers default-pool queries.
pub const RESOURCE_MANAGERS: &str = "resourceManagers";
/// Agent resource manager; resource pools are its children.
pub const AGENT_RM: &str = "agentRM";
/// Kubernetes resource manager.
pub const KUBERNETES_RM: &str = "kubernetesRM";
/// Namespace root of the agent backend.
pub const AGENTS: &str = "agents";
/// Namespace root of the pod backend.
pub const PODS: &str = "pods";

/// Symbolic name of one mailbox, e.g. `/agentRM/gpu-pool`.
///
/// Stored in normalized form: leading slash, no trailing slash, no empty
/// segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Top-level address with a single segment.
    pub fn root(name: &str) -> Self {
        Self::from_segments([name])
    }

    /// Parse a slash-separated path. Empty segments are dropped.
    pub fn parse(path: &str) -> Self {
        Self::from_segments(path.split('/'))
    }

    fn from_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> Self {
        let mut path = String::new();
        for segment in segments.into_iter().filter(|s| !s.is_empty()) {
            path.push('/');
            path.push_str(segment);
        }
        Self(path)
    }

    /// Whether `name` is usable as exactly one address segment.
    pub fn is_segment(name: &str) -> bool {
        !name.is_empty() && !name.contains('/')
    }

    /// Address of a named child.
    pub fn child(&self, name: &str) -> Self {
        self.join(name.split('/'))
    }

    /// Append segments.
    pub fn join<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Self {
        let mut path = self.0.clone();
        for segment in segments.into_iter().filter(|s| !s.is_empty()) {
            path.push('/');
            path.push_str(segment);
        }
        Self(path)
    }

    /// Parent address, or `None` for a top-level address.
    pub fn parent(&self) -> Option<Self> {
        let idx = self.0.rfind('/')?;
        if idx == 0 {
            return None;
        }
        Some(Self(self.0[..idx].to_string()))
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Segments of `self` below `ancestor`, if `ancestor` is a prefix.
    pub fn relative_to<'a>(&'a self, ancestor: &Address) -> Option<Vec<&'a str>> {
        let mut own = self.segments();
        for expected in ancestor.segments() {
            if own.next()? != expected {
                return None;
            }
        }
        Some(own.collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
