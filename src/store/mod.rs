//! Graph State Store - canonical client-side graph
//!
//! Holds the node and edge tables for one client session. The update
//! dispatcher is the only writer; selectors and UI refreshes read.
//! A batch is applied under one write lock, so readers never see half of it.

mod query;
mod upsert;

pub use query::neighbors_of;

use std::collections::BTreeSet;

use parking_lot::RwLock;

use crate::types::{
    Edge, GraphItem, GraphSnapshot, GraphState, GraphStats, Node, NodeId, UpsertSummary,
};

/// Thread-safe in-memory graph
#[derive(Debug, Default)]
pub struct GraphStore {
    pub(crate) state: RwLock<GraphState>,
}

impl GraphStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a graph state
    pub fn with_state(state: GraphState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Run `f` against a consistent view of the whole graph
    pub fn read<R>(&self, f: impl FnOnce(&GraphState) -> R) -> R {
        f(&self.state.read())
    }

    /// Drop every node and edge
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.nodes.clear();
        state.edges.clear();
    }
}

impl GraphStore {
    // Writes (from upsert.rs)
    pub fn upsert(&self, nodes: Vec<Node>, edges: Vec<Edge>) -> UpsertSummary {
        upsert::upsert(self, nodes, edges)
    }

    // Reads (from query.rs)
    pub fn get(&self, id: &str) -> Option<GraphItem> {
        query::get(self, id)
    }

    pub fn get_node(&self, id: &str) -> Option<Node> {
        self.state.read().nodes.get(id).cloned()
    }

    pub fn get_edge(&self, id: &str) -> Option<Edge> {
        self.state.read().edges.get(id).cloned()
    }

    pub fn neighbors_of(&self, node_id: &str) -> BTreeSet<NodeId> {
        query::neighbors_of(&self.state.read(), node_id)
    }

    pub fn all(&self) -> GraphSnapshot {
        GraphSnapshot::from(&*self.state.read())
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.state.read().nodes.keys().cloned().collect()
    }

    pub fn stats(&self) -> GraphStats {
        query::stats(&self.state.read())
    }

    pub fn node_count(&self) -> usize {
        self.state.read().node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.state.read().edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().is_empty()
    }
}
