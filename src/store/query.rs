//! Read-only queries over the graph store

use std::collections::BTreeSet;

use crate::types::{GraphItem, GraphState, GraphStats, NodeId};

use super::GraphStore;

/// Look up a node, then an edge, by id
pub fn get(store: &GraphStore, id: &str) -> Option<GraphItem> {
    let state = store.state.read();
    if let Some(node) = state.nodes.get(id) {
        return Some(GraphItem::Node(node.clone()));
    }
    state.edges.get(id).cloned().map(GraphItem::Edge)
}

/// Ids connected to `node_id` by any stored edge, in either direction
///
/// Unknown ids yield an empty set. Self-loops do not list the node itself.
pub fn neighbors_of(state: &GraphState, node_id: &str) -> BTreeSet<NodeId> {
    state
        .edges
        .values()
        .filter_map(|edge| edge.other_end(node_id))
        .filter(|other| *other != node_id)
        .map(str::to_string)
        .collect()
}

pub fn stats(state: &GraphState) -> GraphStats {
    let dangling_edges = state
        .edges
        .values()
        .filter(|e| !state.nodes.contains_key(&e.from) || !state.nodes.contains_key(&e.to))
        .count();

    GraphStats {
        node_count: state.node_count(),
        edge_count: state.edge_count(),
        dangling_edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, Node};

    fn sample_store() -> GraphStore {
        let store = GraphStore::new();
        store.upsert(
            vec![Node::new("a", "A"), Node::new("b", "B"), Node::new("c", "C")],
            vec![
                Edge::new("e1", "a", "b"),
                Edge::new("e2", "c", "a"),
                Edge::new("e3", "a", "ghost"),
                Edge::new("e4", "a", "a"),
            ],
        );
        store
    }

    #[test]
    fn test_neighbors_both_directions() {
        let store = sample_store();
        let neighbors: Vec<_> = store.neighbors_of("a").into_iter().collect();
        assert_eq!(neighbors, vec!["b", "c", "ghost"]);
        assert_eq!(store.neighbors_of("b").len(), 1);
    }

    #[test]
    fn test_neighbors_of_unknown_is_empty() {
        let store = sample_store();
        assert!(store.neighbors_of("nope").is_empty());
    }

    #[test]
    fn test_get_node_then_edge() {
        let store = sample_store();
        assert!(matches!(store.get("a"), Some(GraphItem::Node(n)) if n.label == "A"));
        assert!(matches!(store.get("e1"), Some(GraphItem::Edge(e)) if e.to == "b"));
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_stats_counts_dangling_edges() {
        let store = sample_store();
        let stats = store.stats();
        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.edge_count, 4);
        assert_eq!(stats.dangling_edges, 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let store = sample_store();
        store.reset();
        assert!(store.is_empty());
        assert!(store.neighbors_of("a").is_empty());
    }
}
