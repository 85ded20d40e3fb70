//! Graph Sync Client
//!
//! Real-time synchronization and context extraction for graph chat
//! clients: keeps a client-side graph current from a WebSocket update
//! stream and derives small, bounded context documents for user queries.
//!
//! # Features
//!
//! - **Resilient channel**: Exponential reconnect backoff and keepalive heartbeat
//! - **Idempotent store**: Last-write-wins upsert keyed by node/edge id
//! - **Deferred attach**: Latest update held until the store is ready
//! - **Bounded context**: Truncation, neighbor expansion, JSON and text output
//!
//! # Modules
//!
//! - `types`: Core data structures (Node, Edge, Envelope, ContextDocument)
//! - `store`: Graph State Store
//! - `channel`: Connection manager and backoff policy
//! - `dispatcher`: Envelope routing into the store
//! - `context`: Context selector and formatter
//! - `client`: Facade wiring everything together
//! - `config`: Configuration surface and loader
//! - `error`: Error taxonomy
//! - `logging`: Tracing subscriber setup
//! - `utils`: Utility functions (timestamps)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use graph_sync::{GraphSyncClient, NoopListener, SelectionMode, SelectionRequest, SyncConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = SyncConfig::with_url("ws://localhost:8000/ws");
//!     let client = GraphSyncClient::new(config, Arc::new(NoopListener)).unwrap();
//!     client.connect();
//!
//!     let text = client.context_text(SelectionMode::All, &SelectionRequest::default());
//!     println!("{}", text.unwrap_or_default());
//!
//!     client.disconnect().await;
//! }
//! ```

pub mod channel;
pub mod client;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use channel::{Backoff, ChannelHandler, ConnectionManager, ConnectionState};
pub use client::GraphSyncClient;
pub use config::{ChannelConfig, ContextOptions, SyncConfig};
pub use context::{ContextSelection, ContextSelector, SelectionRequest};
pub use dispatcher::{DispatchOutcome, DispatchStats, GraphListener, NoopListener, UpdateDispatcher};
pub use error::{ConfigError, ProtocolError, SyncError, SyncResult};
pub use store::GraphStore;
pub use types::{
    CapacityWarning, ContextDocument, Edge, Envelope, GraphSnapshot, GraphState, Node,
    SelectionMode, UpdatePayload, UpsertSummary,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
