//! Agent and slot queries.

use serde::{Deserialize, Serialize};

use super::model::{Agent, Pagination, Slot};
use crate::listing::{Listable, OrderBy, SortKey};

/// Agent field to sort by. Unknown names fall back to [`AgentSortBy::Id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgentSortBy {
    #[default]
    Id,
    Label,
    ResourcePool,
    RegisteredTime,
    NumSlots,
}

impl From<String> for AgentSortBy {
    fn from(s: String) -> Self {
        let name = s.to_lowercase();
        match name.strip_prefix("sort_by_").unwrap_or(&name) {
            "label" => AgentSortBy::Label,
            "resource_pool" => AgentSortBy::ResourcePool,
            "registered_time" => AgentSortBy::RegisteredTime,
            "num_slots" => AgentSortBy::NumSlots,
            _ => AgentSortBy::Id,
        }
    }
}

impl From<AgentSortBy> for String {
    fn from(field: AgentSortBy) -> Self {
        match field {
            AgentSortBy::Id => "id",
            AgentSortBy::Label => "label",
            AgentSortBy::ResourcePool => "resource_pool",
            AgentSortBy::RegisteredTime => "registered_time",
            AgentSortBy::NumSlots => "num_slots",
        }
        .to_string()
    }
}

impl Listable for Agent {
    type SortBy = AgentSortBy;

    fn sort_key(&self, field: AgentSortBy) -> SortKey<'_> {
        match field {
            AgentSortBy::Id => self.id_key(),
            AgentSortBy::Label => SortKey::Text(&self.label),
            AgentSortBy::ResourcePool => SortKey::Text(&self.resource_pool),
            AgentSortBy::RegisteredTime => SortKey::Time(self.registered_time),
            AgentSortBy::NumSlots => SortKey::Int(self.slots.len() as i64),
        }
    }

    fn id_key(&self) -> SortKey<'_> {
        SortKey::Text(&self.id)
    }
}

/// Slot field to sort by. Unknown names fall back to [`SlotSortBy::Id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SlotSortBy {
    #[default]
    Id,
    Enabled,
    DeviceType,
}

impl From<String> for SlotSortBy {
    fn from(s: String) -> Self {
        let name = s.to_lowercase();
        match name.strip_prefix("sort_by_").unwrap_or(&name) {
            "enabled" => SlotSortBy::Enabled,
            "device_type" => SlotSortBy::DeviceType,
            _ => SlotSortBy::Id,
        }
    }
}

impl From<SlotSortBy> for String {
    fn from(field: SlotSortBy) -> Self {
        match field {
            SlotSortBy::Id => "id",
            SlotSortBy::Enabled => "enabled",
            SlotSortBy::DeviceType => "device_type",
        }
        .to_string()
    }
}

impl Listable for Slot {
    type SortBy = SlotSortBy;

    fn sort_key(&self, field: SlotSortBy) -> SortKey<'_> {
        match field {
            SlotSortBy::Id => self.id_key(),
            SlotSortBy::Enabled => SortKey::Flag(self.enabled),
            SlotSortBy::DeviceType => SortKey::Text(match self.device.device_type {
                super::model::DeviceType::Cpu => "cpu",
                super::model::DeviceType::Gpu => "gpu",
            }),
        }
    }

    fn id_key(&self) -> SortKey<'_> {
        SortKey::Text(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GetAgentsRequest {
    /// Keep only agents with this label; empty matches all.
    pub label: String,
    pub order_by: OrderBy,
    pub sort_by: AgentSortBy,
    pub offset: i32,
    /// Page size; zero or negative means no limit.
    pub limit: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GetAgentsResponse {
    pub agents: Vec<Agent>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GetAgentRequest {
    pub agent_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAgentResponse {
    pub agent: Agent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GetSlotsRequest {
    pub agent_id: String,
    pub order_by: OrderBy,
    pub sort_by: SlotSortBy,
    pub offset: i32,
    pub limit: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GetSlotsResponse {
    pub slots: Vec<Slot>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GetSlotRequest {
    pub agent_id: String,
    pub slot_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetSlotResponse {
    pub slot: Slot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EnableAgentRequest {
    pub agent_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnableAgentResponse {
    pub agent: Agent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DisableAgentRequest {
    pub agent_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisableAgentResponse {
    pub agent: Agent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EnableSlotRequest {
    pub agent_id: String,
    pub slot_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnableSlotResponse {
    pub slot: Slot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DisableSlotRequest {
    pub agent_id: String,
    pub slot_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisableSlotResponse {
    pub slot: Slot,
}
