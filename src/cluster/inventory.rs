//! Inventory actor - serves agent and slot queries for one backend namespace.
//!
//! The agent backend and the pod backend both run one of these at their
//! namespace root (`/agents` or `/pods`). It answers for every address below
//! the root: `/{agent}` and `/{agent}/slots/{slot}`.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::actor::{Address, Handler, Reply};
use crate::backend::BackendKind;
use crate::messages::*;
use crate::types::{Error, Result};

/// Where inside the namespace a request landed.
enum Target<'a> {
    Root,
    Agent(&'a str),
    Slot(&'a str, &'a str),
}

#[derive(Debug)]
pub struct InventoryActor {
    kind: BackendKind,
    root: Address,
    agents: BTreeMap<String, Agent>,
}

impl InventoryActor {
    pub fn new(kind: BackendKind, root: Address, agents: Vec<Agent>) -> Self {
        Self {
            kind,
            root,
            agents: agents.into_iter().map(|a| (a.id.clone(), a)).collect(),
        }
    }

    fn parse_target<'a>(&self, target: &'a Address) -> Result<Target<'a>> {
        let rest = target
            .relative_to(&self.root)
            .ok_or_else(|| Error::not_found(format!("{} is outside {}", target, self.root)))?;
        match rest.as_slice() {
            [] => Ok(Target::Root),
            [agent] => Ok(Target::Agent(*agent)),
            [agent, "slots", slot] => Ok(Target::Slot(*agent, *slot)),
            _ => Err(Error::not_found(format!("no such address: {}", target))),
        }
    }

    fn agent(&self, id: &str) -> Result<&Agent> {
        self.agents
            .get(id)
            .ok_or_else(|| Error::not_found(format!("agent {} not found", id)))
    }

    fn agent_mut(&mut self, id: &str) -> Result<&mut Agent> {
        if self.kind == BackendKind::Pod {
            return Err(Error::validation(
                "enabling or disabling nodes is not supported by the kubernetes resource manager",
            ));
        }
        self.agents
            .get_mut(id)
            .ok_or_else(|| Error::not_found(format!("agent {} not found", id)))
    }

    fn slot(&self, agent_id: &str, slot_id: &str) -> Result<&Slot> {
        self.agent(agent_id)?.slot(slot_id).ok_or_else(|| {
            Error::not_found(format!("slot {} not found on agent {}", slot_id, agent_id))
        })
    }

    fn set_agent_enabled(&mut self, id: &str, enabled: bool) -> Result<Agent> {
        let agent = self.agent_mut(id)?;
        agent.enabled = enabled;
        tracing::info!("Agent {} enabled={}", id, enabled);
        Ok(agent.clone())
    }

    fn set_slot_enabled(&mut self, agent_id: &str, slot_id: &str, enabled: bool) -> Result<Slot> {
        let slot = self.agent_mut(agent_id)?.slot_mut(slot_id).ok_or_else(|| {
            Error::not_found(format!("slot {} not found on agent {}", slot_id, agent_id))
        })?;
        slot.enabled = enabled;
        tracing::info!("Slot {}/{} enabled={}", agent_id, slot_id, enabled);
        Ok(slot.clone())
    }
}

#[async_trait]
impl Handler for InventoryActor {
    async fn handle(&mut self, target: &Address, request: Request) -> Reply {
        let kind = request.kind();
        let response: Response = match (self.parse_target(target)?, request) {
            (Target::Root, Request::GetAgents(_)) => GetAgentsResponse {
                agents: self.agents.values().cloned().collect(),
                pagination: Pagination::default(),
            }
            .into(),
            (Target::Agent(id), Request::GetAgent(_)) => GetAgentResponse {
                agent: self.agent(id)?.clone(),
            }
            .into(),
            (Target::Agent(id), Request::GetSlots(_)) => GetSlotsResponse {
                slots: self.agent(id)?.slots.clone(),
                pagination: Pagination::default(),
            }
            .into(),
            (Target::Agent(id), Request::EnableAgent(_)) => EnableAgentResponse {
                agent: self.set_agent_enabled(id, true)?,
            }
            .into(),
            (Target::Agent(id), Request::DisableAgent(_)) => DisableAgentResponse {
                agent: self.set_agent_enabled(id, false)?,
            }
            .into(),
            (Target::Slot(agent, slot), Request::GetSlot(_)) => GetSlotResponse {
                slot: self.slot(agent, slot)?.clone(),
            }
            .into(),
            (Target::Slot(agent, slot), Request::EnableSlot(_)) => EnableSlotResponse {
                slot: self.set_slot_enabled(agent, slot, true)?,
            }
            .into(),
            (Target::Slot(agent, slot), Request::DisableSlot(_)) => DisableSlotResponse {
                slot: self.set_slot_enabled(agent, slot, false)?,
            }
            .into(),
            _ => {
                return Err(Error::validation(format!(
                    "{} is not supported at {}",
                    kind, target
                )))
            }
        };
        Ok(response)
    }
}
