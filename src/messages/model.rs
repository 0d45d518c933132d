//! Agent and slot records returned by the backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of device backing a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    #[default]
    Cpu,
    Gpu,
}

/// Physical device exposed through a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Device {
    pub id: u32,
    pub brand: String,
    pub uuid: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
}

fn enabled_by_default() -> bool {
    true
}

/// One schedulable unit of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub device: Device,
    /// Container currently occupying the slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

impl Slot {
    pub fn new(id: impl Into<String>, device: Device) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            device,
            container: None,
        }
    }
}

/// A compute node: a bare-metal agent, or a node hosting pods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub resource_pool: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default = "Utc::now")]
    pub registered_time: DateTime<Utc>,
    #[serde(default)]
    pub slots: Vec<Slot>,
}

impl Agent {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            resource_pool: String::new(),
            enabled: true,
            registered_time: Utc::now(),
            slots: Vec::new(),
        }
    }

    pub fn with_pool(mut self, pool: impl Into<String>) -> Self {
        self.resource_pool = pool.into();
        self
    }

    pub fn with_slots(mut self, slots: Vec<Slot>) -> Self {
        self.slots = slots;
        self
    }

    pub fn slot(&self, slot_id: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == slot_id)
    }

    pub fn slot_mut(&mut self, slot_id: &str) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.id == slot_id)
    }
}

/// Page descriptor attached to list responses.
///
/// `total` is the item count after filtering, before slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Pagination {
    pub offset: i32,
    pub limit: i32,
    pub start_index: i32,
    pub end_index: i32,
    pub total: i32,
}

impl Pagination {
    /// Number of items on the page.
    pub fn returned(&self) -> i32 {
        self.end_index - self.start_index
    }
}
