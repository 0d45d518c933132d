//! Resource pools service handler.

use serde_json::Value;

use crate::api::ApiServer;
use crate::dispatch::PoolKind;
use crate::ipc::dispatch::str_field;
use crate::types::{Error, Result};

pub async fn handle(api: &ApiServer, method: &str, body: Value) -> Result<Value> {
    match method {
        "GetDefaultGpuPool" => {
            let pool_name = api.default_pool(PoolKind::Gpu).await?;
            Ok(serde_json::json!({ "pool_name": pool_name }))
        }

        "GetDefaultCpuPool" => {
            let pool_name = api.default_pool(PoolKind::Cpu).await?;
            Ok(serde_json::json!({ "pool_name": pool_name }))
        }

        "ValidateResourcePool" => {
            // An absent name is the empty name.
            let name = match body.get("name") {
                None | Some(Value::Null) => String::new(),
                Some(_) => str_field(&body, "name")?,
            };
            api.validate_pool(&name)?;
            Ok(serde_json::json!({ "valid": true }))
        }

        "ListResourcePools" => {
            let pools = api.list_pools();
            Ok(serde_json::json!({
                "count": pools.len(),
                "pools": pools,
            }))
        }

        _ => Err(Error::not_found(format!(
            "Unknown resource_pools method: {}",
            method
        ))),
    }
}
