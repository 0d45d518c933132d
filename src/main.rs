//! Resource manager IPC server - main entry point.
//!
//! Starts the configured backend actors, selects the active backend, and
//! serves the `agents` and `resource_pools` IPC services.

use clap::Parser;
use rm_core::ipc::IpcServer;
use rm_core::{cluster, observability, ApiServer, Config};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(about, version)]
struct Args {
    /// YAML configuration file.
    #[arg(long, env = "RM_CONFIG")]
    config: Option<PathBuf>,

    /// Override `server.listen_addr`.
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(listen) = args.listen {
        config.server.listen_addr = listen;
    }

    observability::init_tracing(&config.observability);

    let agents = match &config.resource_manager.inventory {
        Some(path) => cluster::load_inventory(path)?,
        None => Vec::new(),
    };
    tracing::info!("Loaded {} agents into the inventory", agents.len());

    let cluster = cluster::start(&config.resource_manager, agents)?;
    let api = Arc::new(ApiServer::new(cluster.directory(), &config.dispatch)?);

    let addr: SocketAddr = config.server.listen_addr.parse()?;
    let server = IpcServer::new(api, config.ipc.clone());
    let cancel = server.cancellation_token();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received ctrl-c, shutting down");
            cancel.cancel();
        }
    });

    tracing::info!("Resource manager IPC server starting on {}", addr);
    server.serve(addr).await?;

    cluster.shutdown().await;
    Ok(())
}
