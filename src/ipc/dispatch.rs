//! Top-level IPC dispatch: routes by service, delegates to handlers.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::api::ApiServer;
use crate::ipc::handlers;
use crate::types::{Error, Result};

/// Route an IPC request to the appropriate service handler.
pub async fn route_request(
    api: &ApiServer,
    service: &str,
    method: &str,
    body: Value,
) -> Result<Value> {
    match service {
        "agents" => handlers::agents::handle(api, method, body).await,
        "resource_pools" => handlers::resource_pools::handle(api, method, body).await,
        _ => Err(Error::not_found(format!("Unknown service: {}", service))),
    }
}

// =============================================================================
// Shared helpers used by all handler modules
// =============================================================================

pub fn str_field(body: &Value, key: &str) -> Result<String> {
    body.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| Error::validation(format!("Missing required field: {}", key)))
}

/// Decode a request body. A missing body decodes like an empty object.
pub fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T> {
    let body = match body {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    Ok(serde_json::from_value(body)?)
}

pub fn to_body<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| Error::internal(format!("Serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::GetAgentsRequest;
    use serde_json::json;

    #[test]
    fn test_str_field() {
        let body = json!({"name": "pool-1", "n": 3});
        assert_eq!(str_field(&body, "name").unwrap(), "pool-1");
        assert_eq!(
            str_field(&body, "n").unwrap_err().to_ipc_error_code(),
            "INVALID_ARGUMENT"
        );
    }

    #[test]
    fn test_parse_body_defaults() {
        let req: GetAgentsRequest = parse_body(Value::Null).unwrap();
        assert_eq!(req, GetAgentsRequest::default());

        let err = parse_body::<GetAgentsRequest>(json!({"offset": "one"})).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert_eq!(err.to_ipc_error_code(), "INVALID_ARGUMENT");
    }
}
