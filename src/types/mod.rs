//! Data types for the graph sync client
//!
//! This module contains the graph model, the wire envelopes, and the
//! context document produced for user queries.

mod context;
mod edge;
mod envelope;
mod graph;
mod node;

pub use context::{
    CapacityWarning, ContextDocument, ContextMetadata, EdgeSummary, NodeSummary, SelectionMode,
};
pub use edge::Edge;
pub use envelope::{Envelope, UpdatePayload, PING_TOKEN};
pub use graph::{GraphItem, GraphSnapshot, GraphState, GraphStats, UpsertSummary};
pub use node::Node;

/// Node identifier
pub type NodeId = String;

/// Edge identifier
pub type EdgeId = String;

/// Free-form node/edge attributes
pub type Properties = serde_json::Map<String, serde_json::Value>;
