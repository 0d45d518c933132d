//! IPC integration tests: codec → dispatch → backend actors → response.

use rm_core::cluster::{self, Cluster};
use rm_core::ipc::codec::{write_frame, MSG_ERROR, MSG_REQUEST, MSG_RESPONSE};
use rm_core::ipc::IpcServer;
use rm_core::messages::{Agent, Device, DeviceType, Slot};
use rm_core::types::{DispatchConfig, IpcConfig, ResourceManagerConfig, ResourceManagerKind};
use rm_core::ApiServer;
use serde_json::json;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

fn gpu(id: u32) -> Device {
    Device {
        id,
        brand: "NVIDIA".to_string(),
        uuid: format!("GPU-{}", id),
        device_type: DeviceType::Gpu,
    }
}

/// Five agents labelled a, a, b, a, b spread over pool-1 and pool-2.
fn inventory() -> Vec<Agent> {
    ["a", "a", "b", "a", "b"]
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let pool = if i % 2 == 0 { "pool-1" } else { "pool-2" };
            Agent::new(format!("agent-{}", i), *label)
                .with_pool(pool)
                .with_slots(vec![Slot::new("0", gpu(0)), Slot::new("1", gpu(1))])
        })
        .collect()
}

/// Helper: start the cluster and an IpcServer on a random port.
async fn start_test_server(kind: ResourceManagerKind) -> (std::net::SocketAddr, Cluster) {
    let config = ResourceManagerConfig {
        kind,
        default_gpu_pool: "pool-1".to_string(),
        default_cpu_pool: "pool-2".to_string(),
        resource_pools: vec!["pool-1".to_string(), "pool-2".to_string()],
        inventory: None,
    };
    let cluster = cluster::start(&config, inventory()).unwrap();
    let api = Arc::new(ApiServer::new(cluster.directory(), &DispatchConfig::default()).unwrap());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let server = IpcServer::new(api, IpcConfig::default());
        let _ = server.serve_listener(listener).await;
    });

    (addr, cluster)
}

/// Helper: send a request frame, receive and decode the response.
async fn round_trip(
    stream: &mut TcpStream,
    service: &str,
    method: &str,
    body: serde_json::Value,
) -> (u8, serde_json::Value) {
    let request = json!({
        "id": "test-1",
        "service": service,
        "method": method,
        "body": body,
    });

    let payload = rmp_serde::to_vec_named(&request).unwrap();
    write_frame(stream, MSG_REQUEST, &payload).await.unwrap();

    let mut len_buf = [0u8; 4];
    stream.read_exact(&mut len_buf).await.unwrap();
    let frame_len = u32::from_be_bytes(len_buf) as usize;
    let mut frame_data = vec![0u8; frame_len];
    stream.read_exact(&mut frame_data).await.unwrap();

    let msg_type = frame_data[0];
    let response: serde_json::Value = rmp_serde::from_slice(&frame_data[1..]).unwrap();
    (msg_type, response)
}

fn error_code(response: &serde_json::Value) -> &str {
    response["error"]["code"].as_str().unwrap()
}

fn agent_ids(body: &serde_json::Value) -> Vec<&str> {
    body["agents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_get_agents_filter_sort_paginate() {
    let (addr, _cluster) = start_test_server(ResourceManagerKind::Agent).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let body = json!({
        "label": "a",
        "order_by": "ORDER_BY_ASC",
        "sort_by": "SORT_BY_ID",
        "offset": 1,
        "limit": 2,
    });
    let (msg_type, response) = round_trip(&mut stream, "agents", "GetAgents", body).await;

    assert_eq!(msg_type, MSG_RESPONSE);
    assert_eq!(response["id"], "test-1");
    assert_eq!(response["ok"], true);
    let body = &response["body"];
    assert_eq!(agent_ids(body), vec!["agent-1", "agent-3"]);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["start_index"], 1);
    assert_eq!(body["pagination"]["end_index"], 3);
}

#[tokio::test]
async fn test_get_agents_offset_past_end() {
    let (addr, _cluster) = start_test_server(ResourceManagerKind::Agent).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let body = json!({ "label": "b", "offset": 5 });
    let (msg_type, response) = round_trip(&mut stream, "agents", "GetAgents", body).await;

    assert_eq!(msg_type, MSG_RESPONSE);
    assert!(agent_ids(&response["body"]).is_empty());
    assert_eq!(response["body"]["pagination"]["total"], 2);
}

#[tokio::test]
async fn test_get_agents_sorted_by_pool_desc() {
    let (addr, _cluster) = start_test_server(ResourceManagerKind::Agent).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let body = json!({ "sort_by": "SORT_BY_RESOURCE_POOL", "order_by": "ORDER_BY_DESC" });
    let (_, response) = round_trip(&mut stream, "agents", "GetAgents", body).await;

    assert_eq!(
        agent_ids(&response["body"]),
        vec!["agent-3", "agent-1", "agent-4", "agent-2", "agent-0"]
    );
}

#[tokio::test]
async fn test_slot_toggle_visible_on_same_connection() {
    let (addr, _cluster) = start_test_server(ResourceManagerKind::Agent).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let target = json!({ "agent_id": "agent-2", "slot_id": "1" });
    let (msg_type, response) =
        round_trip(&mut stream, "agents", "DisableSlot", target.clone()).await;
    assert_eq!(msg_type, MSG_RESPONSE);
    assert_eq!(response["body"]["slot"]["enabled"], false);

    let (_, response) = round_trip(
        &mut stream,
        "agents",
        "GetSlots",
        json!({ "agent_id": "agent-2", "sort_by": "SORT_BY_ENABLED" }),
    )
    .await;
    let slots = response["body"]["slots"].as_array().unwrap();
    assert_eq!(slots[0]["id"], "1");
    assert_eq!(slots[0]["enabled"], false);
    assert_eq!(slots[1]["enabled"], true);
}

#[tokio::test]
async fn test_unknown_agent_not_found() {
    let (addr, _cluster) = start_test_server(ResourceManagerKind::Agent).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let (msg_type, response) =
        round_trip(&mut stream, "agents", "GetAgent", json!({ "agent_id": "nope" })).await;
    assert_eq!(msg_type, MSG_ERROR);
    assert_eq!(response["ok"], false);
    assert_eq!(error_code(&response), "NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_service_returns_error() {
    let (addr, _cluster) = start_test_server(ResourceManagerKind::Agent).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let (msg_type, response) = round_trip(&mut stream, "nonexistent", "Foo", json!({})).await;

    assert_eq!(msg_type, MSG_ERROR);
    assert_eq!(response["ok"], false);
    assert_eq!(error_code(&response), "NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_method_returns_error() {
    let (addr, _cluster) = start_test_server(ResourceManagerKind::Agent).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let (msg_type, response) = round_trip(&mut stream, "agents", "Frobnicate", json!({})).await;
    assert_eq!(msg_type, MSG_ERROR);
    assert_eq!(error_code(&response), "NOT_FOUND");
}

#[tokio::test]
async fn test_validate_resource_pool() {
    let (addr, _cluster) = start_test_server(ResourceManagerKind::Agent).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let (msg_type, response) = round_trip(
        &mut stream,
        "resource_pools",
        "ValidateResourcePool",
        json!({ "name": "pool-2" }),
    )
    .await;
    assert_eq!(msg_type, MSG_RESPONSE);
    assert_eq!(response["body"]["valid"], true);

    let (msg_type, response) =
        round_trip(&mut stream, "resource_pools", "ValidateResourcePool", json!({})).await;
    assert_eq!(msg_type, MSG_RESPONSE);
    assert_eq!(response["body"]["valid"], true);

    let (msg_type, response) = round_trip(
        &mut stream,
        "resource_pools",
        "ValidateResourcePool",
        json!({ "name": "gpu-pool-A" }),
    )
    .await;
    assert_eq!(msg_type, MSG_ERROR);
    assert_eq!(error_code(&response), "INVALID_ARGUMENT");
    assert!(response["error"]["message"]
        .as_str()
        .unwrap()
        .contains("cannot find resource pool: gpu-pool-A"));
}

#[tokio::test]
async fn test_default_pools_and_listing() {
    let (addr, _cluster) = start_test_server(ResourceManagerKind::Agent).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let (_, response) =
        round_trip(&mut stream, "resource_pools", "GetDefaultGpuPool", json!({})).await;
    assert_eq!(response["body"]["pool_name"], "pool-1");

    let (_, response) =
        round_trip(&mut stream, "resource_pools", "GetDefaultCpuPool", json!({})).await;
    assert_eq!(response["body"]["pool_name"], "pool-2");

    let (_, response) =
        round_trip(&mut stream, "resource_pools", "ListResourcePools", json!({})).await;
    assert_eq!(response["body"]["pools"], json!(["pool-1", "pool-2"]));
    assert_eq!(response["body"]["count"], 2);
}

#[tokio::test]
async fn test_pod_backend_rejects_named_pools() {
    let (addr, _cluster) = start_test_server(ResourceManagerKind::Kubernetes).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let (msg_type, response) = round_trip(
        &mut stream,
        "resource_pools",
        "ValidateResourcePool",
        json!({ "name": "pool-1" }),
    )
    .await;
    assert_eq!(msg_type, MSG_ERROR);
    assert_eq!(error_code(&response), "INVALID_ARGUMENT");

    let (msg_type, response) = round_trip(
        &mut stream,
        "agents",
        "GetAgents",
        json!({ "label": "b" }),
    )
    .await;
    assert_eq!(msg_type, MSG_RESPONSE);
    assert_eq!(agent_ids(&response["body"]), vec!["agent-2", "agent-4"]);
}

#[tokio::test]
async fn test_invalid_message_type() {
    let (addr, _cluster) = start_test_server(ResourceManagerKind::Agent).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    write_frame(&mut stream, MSG_RESPONSE, b"").await.unwrap();

    let mut len_buf = [0u8; 4];
    stream.read_exact(&mut len_buf).await.unwrap();
    let mut frame_data = vec![0u8; u32::from_be_bytes(len_buf) as usize];
    stream.read_exact(&mut frame_data).await.unwrap();

    assert_eq!(frame_data[0], MSG_ERROR);
    let response: serde_json::Value = rmp_serde::from_slice(&frame_data[1..]).unwrap();
    assert_eq!(error_code(&response), "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_bad_body_rejected() {
    let (addr, _cluster) = start_test_server(ResourceManagerKind::Agent).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let (msg_type, response) =
        round_trip(&mut stream, "agents", "GetAgents", json!({ "limit": "ten" })).await;
    assert_eq!(msg_type, MSG_ERROR);
    assert_eq!(error_code(&response), "INVALID_ARGUMENT");
}
