//! Upsert for the graph store

use crate::types::{Edge, Node, UpsertSummary};

use super::GraphStore;

/// Merge nodes and edges by id (holds the write lock for the whole batch)
///
/// Last write wins per id. Edges may reference nodes that are not stored.
pub fn upsert(store: &GraphStore, nodes: Vec<Node>, edges: Vec<Edge>) -> UpsertSummary {
    let mut state = store.state.write();
    let mut summary = UpsertSummary::default();

    for node in nodes {
        if state.nodes.insert(node.id.clone(), node).is_some() {
            summary.nodes_updated += 1;
        } else {
            summary.nodes_inserted += 1;
        }
    }

    for edge in edges {
        if state.edges.insert(edge.key(), edge).is_some() {
            summary.edges_updated += 1;
        } else {
            summary.edges_inserted += 1;
        }
    }

    summary
}
