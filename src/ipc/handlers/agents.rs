//! Agents service handler: agent and slot queries and enable/disable.

use serde_json::Value;

use crate::api::ApiServer;
use crate::ipc::dispatch::{parse_body, to_body};
use crate::types::{Error, Result};

pub async fn handle(api: &ApiServer, method: &str, body: Value) -> Result<Value> {
    match method {
        "GetAgents" => to_body(&api.get_agents(parse_body(body)?).await?),
        "GetAgent" => to_body(&api.get_agent(parse_body(body)?).await?),
        "EnableAgent" => to_body(&api.enable_agent(parse_body(body)?).await?),
        "DisableAgent" => to_body(&api.disable_agent(parse_body(body)?).await?),
        "GetSlots" => to_body(&api.get_slots(parse_body(body)?).await?),
        "GetSlot" => to_body(&api.get_slot(parse_body(body)?).await?),
        "EnableSlot" => to_body(&api.enable_slot(parse_body(body)?).await?),
        "DisableSlot" => to_body(&api.disable_slot(parse_body(body)?).await?),
        _ => Err(Error::not_found(format!("Unknown agents method: {}", method))),
    }
}
