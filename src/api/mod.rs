//! API service - the typed operations behind the inbound RPC surface.
//!
//! Each operation validates its identifiers, forwards one request to the
//! active backend through the [`Router`], and post-processes list replies with
//! the filter → sort → paginate pipeline. The service holds no locks and is
//! shared across connections through an `Arc`.

use std::sync::Arc;

use crate::actor::Directory;
use crate::backend::{self, BackendKind};
use crate::dispatch::{LogicalPath, PoolKind, PoolResolver, Router};
use crate::listing::{self, ListQuery};
use crate::messages::*;
use crate::types::{AgentId, DispatchConfig, Error, Result, SlotId};

fn agent_id(raw: &str) -> Result<AgentId> {
    AgentId::from_string(raw.to_string()).map_err(Error::validation)
}

fn slot_id(raw: &str) -> Result<SlotId> {
    SlotId::from_string(raw.to_string()).map_err(Error::validation)
}

#[derive(Debug, Clone)]
pub struct ApiServer {
    router: Router,
    pools: PoolResolver,
}

impl ApiServer {
    /// Select the active backend from `directory` and wire the router and the
    /// pool resolver to it.
    ///
    /// Fails when both backends are registered.
    pub fn new(directory: Arc<Directory>, config: &DispatchConfig) -> Result<Self> {
        let selected = backend::select(&directory)?;
        Ok(Self {
            router: Router::new(Arc::clone(&directory), selected.clone(), config.ask_timeout),
            pools: PoolResolver::new(directory, selected, config.ask_timeout),
        })
    }

    pub fn backend_kind(&self) -> Option<BackendKind> {
        self.router.backend().ok().map(|b| b.kind())
    }

    // =========================================================================
    // Agents
    // =========================================================================

    pub async fn get_agents(&self, req: GetAgentsRequest) -> Result<GetAgentsResponse> {
        let query = ListQuery {
            order_by: req.order_by,
            sort_by: req.sort_by,
            offset: req.offset,
            limit: req.limit,
        };
        let label = req.label.clone();

        let mut resp: GetAgentsResponse = self.router.route(&LogicalPath::agents(), req).await?;
        resp.pagination = listing::apply(
            &mut resp.agents,
            |agent| label.is_empty() || agent.label == label,
            query,
        );

        tracing::debug!(
            "GetAgents label={:?} returned {} of {}",
            label,
            resp.pagination.returned(),
            resp.pagination.total
        );
        Ok(resp)
    }

    pub async fn get_agent(&self, req: GetAgentRequest) -> Result<GetAgentResponse> {
        let path = LogicalPath::agent(&agent_id(&req.agent_id)?);
        self.router.route(&path, req).await
    }

    pub async fn enable_agent(&self, req: EnableAgentRequest) -> Result<EnableAgentResponse> {
        let path = LogicalPath::agent(&agent_id(&req.agent_id)?);
        self.router.route(&path, req).await
    }

    pub async fn disable_agent(&self, req: DisableAgentRequest) -> Result<DisableAgentResponse> {
        let path = LogicalPath::agent(&agent_id(&req.agent_id)?);
        self.router.route(&path, req).await
    }

    // =========================================================================
    // Slots
    // =========================================================================

    pub async fn get_slots(&self, req: GetSlotsRequest) -> Result<GetSlotsResponse> {
        let path = LogicalPath::agent(&agent_id(&req.agent_id)?);
        let query = ListQuery {
            order_by: req.order_by,
            sort_by: req.sort_by,
            offset: req.offset,
            limit: req.limit,
        };

        let mut resp: GetSlotsResponse = self.router.route(&path, req).await?;
        resp.pagination = listing::apply(&mut resp.slots, |_| true, query);
        Ok(resp)
    }

    pub async fn get_slot(&self, req: GetSlotRequest) -> Result<GetSlotResponse> {
        let path = LogicalPath::slot(&agent_id(&req.agent_id)?, &slot_id(&req.slot_id)?);
        self.router.route(&path, req).await
    }

    pub async fn enable_slot(&self, req: EnableSlotRequest) -> Result<EnableSlotResponse> {
        let path = LogicalPath::slot(&agent_id(&req.agent_id)?, &slot_id(&req.slot_id)?);
        self.router.route(&path, req).await
    }

    pub async fn disable_slot(&self, req: DisableSlotRequest) -> Result<DisableSlotResponse> {
        let path = LogicalPath::slot(&agent_id(&req.agent_id)?, &slot_id(&req.slot_id)?);
        self.router.route(&path, req).await
    }

    // =========================================================================
    // Resource pools
    // =========================================================================

    pub async fn default_pool(&self, kind: PoolKind) -> Result<String> {
        self.pools.default_pool(kind).await
    }

    /// Empty names are valid and mean "use the default pool".
    pub fn validate_pool(&self, name: &str) -> Result<()> {
        self.pools.validate_pool(name)
    }

    pub fn list_pools(&self) -> Vec<String> {
        self.pools.pool_names()
    }
}
