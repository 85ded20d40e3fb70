//! Graph Sync Client - Binary Entry Point
//!
//! Usage: `graph-sync [config.json]`
//!
//! Connects to the configured channel, logs incoming updates, and on
//! Ctrl-C prints the whole graph as prompt context before disconnecting.

use std::path::PathBuf;
use std::sync::Arc;

use graph_sync::config::load_config;
use graph_sync::logging::init_subscriber;
use graph_sync::{
    Edge, GraphListener, GraphSyncClient, Node, SelectionMode, SelectionRequest, SyncError,
};
use tracing::{error, info};

/// Logs consumer-facing events
struct LogListener;

impl GraphListener for LogListener {
    fn on_connect(&self) {
        info!("connected to graph channel");
    }

    fn on_disconnect(&self) {
        info!("disconnected from graph channel");
    }

    fn on_update(&self, nodes: &[Node], edges: &[Edge]) {
        info!(nodes = nodes.len(), edges = edges.len(), "graph updated");
    }

    fn on_error(&self, err: &SyncError) {
        if err.is_user_visible() {
            error!(error = %err, "graph channel unavailable");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;
    init_subscriber(&config.log_level);

    let client = GraphSyncClient::new(config, Arc::new(LogListener))?;
    client.connect();

    tokio::signal::ctrl_c().await?;

    let stats = client.store().stats();
    info!(
        nodes = stats.node_count,
        edges = stats.edge_count,
        "shutting down"
    );
    if let Some(text) = client.context_text(SelectionMode::All, &SelectionRequest::default()) {
        println!("{}", text);
    }

    client.disconnect().await;
    Ok(())
}
