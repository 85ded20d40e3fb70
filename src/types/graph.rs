//! Graph state container type

use indexmap::IndexMap;

use super::{Edge, EdgeId, Node, NodeId};

/// Canonical node and edge tables
///
/// Both tables keep first-insertion order; overwriting an entry keeps its
/// original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphState {
    pub nodes: IndexMap<NodeId, Node>,
    pub edges: IndexMap<EdgeId, Edge>,
}

impl GraphState {
    /// Create an empty graph state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Owned copy of the graph contents, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl From<&GraphState> for GraphSnapshot {
    fn from(state: &GraphState) -> Self {
        Self {
            nodes: state.nodes.values().cloned().collect(),
            edges: state.edges.values().cloned().collect(),
        }
    }
}

/// A stored entry looked up by id
#[derive(Debug, Clone, PartialEq)]
pub enum GraphItem {
    Node(Node),
    Edge(Edge),
}

/// Counts from a single upsert batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertSummary {
    pub nodes_inserted: usize,
    pub nodes_updated: usize,
    pub edges_inserted: usize,
    pub edges_updated: usize,
}

impl UpsertSummary {
    /// Total entries touched by the batch
    pub fn total(&self) -> usize {
        self.nodes_inserted + self.nodes_updated + self.edges_inserted + self.edges_updated
    }
}

/// Graph size statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// Edges with at least one endpoint not present in the node table
    pub dangling_edges: usize,
}
