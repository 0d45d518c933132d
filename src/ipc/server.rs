//! TCP IPC server: accept loop and per-connection handler.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::api::ApiServer;
use crate::ipc::codec::{read_frame, write_frame, MSG_ERROR, MSG_REQUEST, MSG_RESPONSE};
use crate::ipc::dispatch;
use crate::types::{IpcConfig, RequestId};

/// Encode a JSON value to msgpack. Logs and returns an error on failure
/// instead of silently producing an empty vec.
fn encode_msgpack(value: &serde_json::Value) -> std::io::Result<Vec<u8>> {
    rmp_serde::to_vec_named(value).map_err(|e| {
        tracing::error!("Msgpack encoding failed: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
    })
}

fn error_payload(id: &str, code: &str, message: String) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "ok": false,
        "error": {
            "code": code,
            "message": message,
        }
    })
}

/// IPC server wrapping the API service.
#[derive(Debug)]
pub struct IpcServer {
    api: Arc<ApiServer>,
    cancel: CancellationToken,
    ipc_config: IpcConfig,
}

impl IpcServer {
    pub fn new(api: Arc<ApiServer>, ipc_config: IpcConfig) -> Self {
        Self {
            api,
            cancel: CancellationToken::new(),
            ipc_config,
        }
    }

    /// Bind `addr` and serve until cancelled or a fatal error occurs.
    pub async fn serve(&self, addr: SocketAddr) -> std::io::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        self.serve_listener(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve_listener(&self, listener: TcpListener) -> std::io::Result<()> {
        let conn_semaphore = Arc::new(Semaphore::new(self.ipc_config.max_connections));
        tracing::info!(
            "IPC server listening on {} (max_connections={})",
            listener.local_addr()?,
            self.ipc_config.max_connections,
        );

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("IPC server shutting down");
                    break;
                }
                accept = listener.accept() => {
                    let (stream, peer) = accept?;

                    // Backpressure when at capacity.
                    let permit = match conn_semaphore.clone().try_acquire_owned() {
                        Ok(permit) => permit,
                        Err(_) => {
                            tracing::warn!(
                                "Connection from {} rejected: at max_connections ({})",
                                peer,
                                self.ipc_config.max_connections,
                            );
                            drop(stream);
                            continue;
                        }
                    };

                    tracing::debug!("IPC connection from {} (active={})",
                        peer,
                        self.ipc_config.max_connections - conn_semaphore.available_permits(),
                    );
                    let api = Arc::clone(&self.api);
                    let cancel = self.cancel.clone();
                    let ipc_config = self.ipc_config.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, api, cancel, ipc_config, permit).await {
                            tracing::warn!("Connection from {} error: {}", peer, e);
                        }
                    });
                }
            }
        }
        Ok(())
    }

    /// Request graceful shutdown.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Handle a single TCP connection: read frames, dispatch, write responses.
async fn handle_connection(
    stream: tokio::net::TcpStream,
    api: Arc<ApiServer>,
    cancel: CancellationToken,
    ipc_config: IpcConfig,
    _permit: OwnedSemaphorePermit, // held for connection lifetime
) -> std::io::Result<()> {
    let (mut reader, mut writer) = stream.into_split();
    let read_timeout = Duration::from_secs(ipc_config.read_timeout_secs);
    let write_timeout = Duration::from_secs(ipc_config.write_timeout_secs);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            frame_result = tokio::time::timeout(read_timeout, read_frame(&mut reader, ipc_config.max_frame_bytes)) => {
                let frame = match frame_result {
                    Err(_elapsed) => {
                        tracing::debug!("Read timeout ({}s), dropping connection", ipc_config.read_timeout_secs);
                        break;
                    }
                    Ok(result) => match result? {
                        Some(f) => f,
                        None => break, // clean EOF
                    },
                };

                let (msg_type, payload_bytes) = frame;

                if msg_type != MSG_REQUEST {
                    let err_payload = error_payload(
                        "",
                        "INVALID_ARGUMENT",
                        format!("Unexpected message type: 0x{:02X}", msg_type),
                    );
                    let encoded = encode_msgpack(&err_payload)?;
                    timed_write(&mut writer, MSG_ERROR, &encoded, write_timeout).await?;
                    continue;
                }

                let request: serde_json::Value = match rmp_serde::from_slice(&payload_bytes) {
                    Ok(v) => v,
                    Err(e) => {
                        let err_payload =
                            error_payload("", "INVALID_ARGUMENT", format!("Invalid msgpack: {}", e));
                        let encoded = encode_msgpack(&err_payload)?;
                        timed_write(&mut writer, MSG_ERROR, &encoded, write_timeout).await?;
                        continue;
                    }
                };

                let request_id = request
                    .get("id")
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| RequestId::new().to_string());
                let service = request.get("service").and_then(|v| v.as_str()).unwrap_or("");
                let method = request.get("method").and_then(|v| v.as_str()).unwrap_or("");
                let body = request
                    .get("body")
                    .cloned()
                    .unwrap_or(serde_json::Value::Null);

                tracing::debug!("IPC request {} {}.{}", request_id, service, method);

                let response = match dispatch::route_request(&api, service, method, body).await {
                    Ok(response_body) => {
                        let response = serde_json::json!({
                            "id": request_id,
                            "ok": true,
                            "body": response_body,
                        });
                        (MSG_RESPONSE, response)
                    }
                    Err(e) => {
                        tracing::debug!("IPC request {} failed: {}", request_id, e);
                        let code = e.to_ipc_error_code();
                        (MSG_ERROR, error_payload(&request_id, code, e.to_string()))
                    }
                };
                let encoded = encode_msgpack(&response.1)?;
                timed_write(&mut writer, response.0, &encoded, write_timeout).await?;
            }
        }
    }

    Ok(())
}

/// Write a frame with a timeout. Slow consumers get their connection dropped.
async fn timed_write<W: tokio::io::AsyncWriteExt + Unpin>(
    writer: &mut W,
    msg_type: u8,
    payload: &[u8],
    timeout: Duration,
) -> std::io::Result<()> {
    tokio::time::timeout(timeout, write_frame(writer, msg_type, payload))
        .await
        .map_err(|_| {
            tracing::warn!("Write timeout ({}s), dropping connection", timeout.as_secs());
            std::io::Error::new(std::io::ErrorKind::TimedOut, "write timeout")
        })?
}
