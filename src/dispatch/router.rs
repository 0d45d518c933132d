//! Request router - forwards queries to whichever backend is active.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::actor::{ask, Directory};
use crate::backend::ResourceBackend;
use crate::messages::{Request, Response};
use crate::types::{AgentId, Error, Result, SlotId};

/// Backend-neutral path such as `/agents/{id}/slots/{id}`.
///
/// The `agents` root is logical: the router re-roots it under the active
/// backend's namespace, so the same path shape serves both backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalPath {
    segments: Vec<String>,
}

impl LogicalPath {
    /// `/agents`
    pub fn agents() -> Self {
        Self { segments: vec![] }
    }

    /// `/agents/{agent_id}`
    pub fn agent(agent_id: &AgentId) -> Self {
        Self {
            segments: vec![agent_id.to_string()],
        }
    }

    /// `/agents/{agent_id}/slots/{slot_id}`
    pub fn slot(agent_id: &AgentId, slot_id: &SlotId) -> Self {
        Self {
            segments: vec![agent_id.to_string(), "slots".to_string(), slot_id.to_string()],
        }
    }

    /// Segments below the logical root.
    pub fn segments(&self) -> Vec<&str> {
        self.segments.iter().map(String::as_str).collect()
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/agents")?;
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Routes logical paths to the active backend's mailboxes.
#[derive(Debug, Clone)]
pub struct Router {
    directory: Arc<Directory>,
    backend: Option<Arc<dyn ResourceBackend>>,
    ask_timeout: Duration,
}

impl Router {
    pub fn new(
        directory: Arc<Directory>,
        backend: Option<Arc<dyn ResourceBackend>>,
        ask_timeout: Duration,
    ) -> Self {
        Self {
            directory,
            backend,
            ask_timeout,
        }
    }

    /// The active backend, or [`Error::BackendAbsent`].
    pub fn backend(&self) -> Result<&Arc<dyn ResourceBackend>> {
        self.backend.as_ref().ok_or(Error::BackendAbsent)
    }

    /// Forward `request` to the mailbox responsible for `path` and wait for
    /// its reply.
    ///
    /// The target is the mailbox registered at the re-rooted address or its
    /// nearest registered ancestor. One attempt, bounded by the ask timeout.
    pub async fn route<Req, Resp>(&self, path: &LogicalPath, request: Req) -> Result<Resp>
    where
        Req: Into<Request>,
        Resp: TryFrom<Response, Error = Response>,
    {
        let backend = self.backend()?;
        let target = backend.address_for(&path.segments());
        let mailbox = self
            .directory
            .nearest(&target)
            .ok_or_else(|| Error::not_found(format!("no mailbox for {}", target)))?;

        tracing::debug!("Routing {} to {} backend at {}", path, backend.kind(), target);

        ask(mailbox, target, request, self.ask_timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{spawn, Address, DirectoryBuilder, Handler, Mailbox, Reply};
    use crate::backend::{AgentBackend, PodBackend};
    use crate::messages::{GetAgentRequest, GetAgentResponse, Agent};
    use async_trait::async_trait;

    /// Replies with an agent whose id is the address it was asked at.
    struct WhoAmI;

    #[async_trait]
    impl Handler for WhoAmI {
        async fn handle(&mut self, target: &Address, _request: Request) -> Reply {
            Ok(GetAgentResponse {
                agent: Agent::new(target.to_string(), ""),
            }
            .into())
        }
    }

    fn agent_id(s: &str) -> AgentId {
        AgentId::from_string(s.to_string()).unwrap()
    }

    #[test]
    fn test_logical_path_display() {
        let slot = LogicalPath::slot(&agent_id("a1"), &SlotId::from_string("3".into()).unwrap());
        assert_eq!(slot.to_string(), "/agents/a1/slots/3");
        assert_eq!(LogicalPath::agents().to_string(), "/agents");
    }

    #[tokio::test]
    async fn test_route_without_backend() {
        let router = Router::new(Arc::new(Directory::default()), None, Duration::from_secs(1));
        let err = router
            .route::<_, GetAgentResponse>(&LogicalPath::agents(), GetAgentRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BackendAbsent));
    }

    #[tokio::test]
    async fn test_route_reroots_under_pods() {
        let (pods, _handle) = spawn(Address::root("pods"), WhoAmI);
        let mut builder = DirectoryBuilder::new();
        builder.register(pods).unwrap();
        let router = Router::new(
            Arc::new(builder.build()),
            Some(Arc::new(PodBackend::new())),
            Duration::from_secs(1),
        );

        let resp: GetAgentResponse = router
            .route(&LogicalPath::agent(&agent_id("node-1")), GetAgentRequest::default())
            .await
            .unwrap();
        assert_eq!(resp.agent.id, "/pods/node-1");
    }

    #[tokio::test]
    async fn test_route_prefers_most_specific_mailbox() {
        let (agents, _h1) = spawn(Address::root("agents"), WhoAmI);
        let (a1, mut a1_rx) = Mailbox::channel(Address::parse("/agents/a1"));
        tokio::spawn(async move {
            while let Some(envelope) = a1_rx.recv().await {
                let _ = envelope.reply.send(Ok(GetAgentResponse {
                    agent: Agent::new("dedicated", ""),
                }
                .into()));
            }
        });

        let mut builder = DirectoryBuilder::new();
        builder.register(agents).unwrap().register(a1).unwrap();
        let router = Router::new(
            Arc::new(builder.build()),
            Some(Arc::new(AgentBackend::new())),
            Duration::from_secs(1),
        );

        let resp: GetAgentResponse = router
            .route(&LogicalPath::agent(&agent_id("a1")), GetAgentRequest::default())
            .await
            .unwrap();
        assert_eq!(resp.agent.id, "dedicated");

        let resp: GetAgentResponse = router
            .route(&LogicalPath::agent(&agent_id("a2")), GetAgentRequest::default())
            .await
            .unwrap();
        assert_eq!(resp.agent.id, "/agents/a2");
    }

    #[tokio::test]
    async fn test_route_namespace_missing() {
        // Backend injected but its namespace mailbox was never registered.
        let router = Router::new(
            Arc::new(Directory::default()),
            Some(Arc::new(AgentBackend::new())),
            Duration::from_secs(1),
        );
        let err = router
            .route::<_, GetAgentResponse>(&LogicalPath::agents(), GetAgentRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_ipc_error_code(), "NOT_FOUND");
    }
}
