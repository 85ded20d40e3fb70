//! Context selection over the graph store

use std::collections::HashSet;

use tracing::warn;

use crate::config::ContextOptions;
use crate::store::{neighbors_of, GraphStore};
use crate::types::{
    CapacityWarning, ContextDocument, ContextMetadata, EdgeSummary, GraphState, NodeId,
    NodeSummary, SelectionMode,
};
use crate::utils::time::iso8601_now;

/// Externally supplied id lists for the `selected` and `visible` modes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRequest {
    pub selected: Vec<NodeId>,
    pub visible: Vec<NodeId>,
}

impl SelectionRequest {
    pub fn selected<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected: ids.into_iter().map(Into::into).collect(),
            visible: Vec::new(),
        }
    }

    pub fn visible<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected: Vec::new(),
            visible: ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Final id list for one selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedIds {
    /// Base ids (bounded) followed by any neighbor ids
    pub ids: Vec<NodeId>,
    pub warning: Option<CapacityWarning>,
}

/// A built context document plus any capacity warning
#[derive(Debug, Clone, PartialEq)]
pub struct ContextSelection {
    pub document: ContextDocument,
    pub warning: Option<CapacityWarning>,
}

/// Computes bounded, optionally neighbor-expanded subsets of the graph
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextSelector {
    options: ContextOptions,
}

impl ContextSelector {
    pub fn new(options: ContextOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    /// Build a context document from the current store contents.
    ///
    /// Returns `None` for [`SelectionMode::None`].
    pub fn select(
        &self,
        store: &GraphStore,
        mode: SelectionMode,
        request: &SelectionRequest,
    ) -> Option<ContextSelection> {
        store.read(|state| self.select_from(state, mode, request))
    }

    /// Same as [`select`](Self::select) over a borrowed state
    pub fn select_from(
        &self,
        state: &GraphState,
        mode: SelectionMode,
        request: &SelectionRequest,
    ) -> Option<ContextSelection> {
        let resolved = self.resolve_ids(state, mode, request)?;

        let nodes: Vec<NodeSummary> = resolved
            .ids
            .iter()
            .filter_map(|id| state.nodes.get(id))
            .map(|node| NodeSummary::from_node(node, self.options.include_properties))
            .collect();

        let relationships = if self.options.include_relationships {
            let members: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
            state
                .edges
                .values()
                .filter(|e| members.contains(e.from.as_str()) && members.contains(e.to.as_str()))
                .map(|e| EdgeSummary::from_edge(e, self.options.include_properties))
                .collect()
        } else {
            Vec::new()
        };

        Some(ContextSelection {
            document: ContextDocument {
                metadata: ContextMetadata {
                    mode,
                    node_count: nodes.len(),
                    timestamp: iso8601_now(),
                },
                nodes,
                relationships,
            },
            warning: resolved.warning,
        })
    }

    /// Resolve, bound, and expand the id list for `mode`.
    ///
    /// Duplicate base ids are collapsed before the limit applies. Neighbors
    /// are added after truncation, so with neighbor inclusion on the result
    /// may exceed the limit.
    pub fn resolve_ids(
        &self,
        state: &GraphState,
        mode: SelectionMode,
        request: &SelectionRequest,
    ) -> Option<ResolvedIds> {
        let base: Vec<NodeId> = match mode {
            SelectionMode::Selected => request.selected.clone(),
            SelectionMode::Visible => request.visible.clone(),
            SelectionMode::All => state.nodes.keys().cloned().collect(),
            SelectionMode::None => return None,
        };

        let mut seen: HashSet<NodeId> = HashSet::with_capacity(base.len());
        let mut ids: Vec<NodeId> = base
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        let limit = self.options.max_nodes_in_context;
        let warning = if ids.len() > limit {
            let warning = CapacityWarning {
                requested: ids.len(),
                limit,
            };
            warn!(%mode, requested = warning.requested, limit, "context selection truncated");
            ids.truncate(limit);
            Some(warning)
        } else {
            None
        };

        if self.options.auto_include_neighbors {
            let mut members: HashSet<NodeId> = ids.iter().cloned().collect();
            let mut expanded = Vec::new();
            for id in &ids {
                for neighbor in neighbors_of(state, id) {
                    if members.insert(neighbor.clone()) {
                        expanded.push(neighbor);
                    }
                }
            }
            ids.extend(expanded);
        }

        Some(ResolvedIds { ids, warning })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, Node};

    fn options(max: usize, neighbors: bool) -> ContextOptions {
        ContextOptions {
            max_nodes_in_context: max,
            auto_include_neighbors: neighbors,
            ..ContextOptions::default()
        }
    }

    fn chain_store() -> GraphStore {
        let store = GraphStore::new();
        store.upsert(
            vec![
                Node::new("n1", "One"),
                Node::new("n2", "Two"),
                Node::new("n3", "Three"),
                Node::new("n4", "Four"),
            ],
            vec![
                Edge::new("e12", "n1", "n2"),
                Edge::new("e23", "n2", "n3"),
                Edge::new("e34", "n3", "n4"),
            ],
        );
        store
    }

    #[test]
    fn test_none_mode_short_circuits() {
        let selector = ContextSelector::default();
        let store = chain_store();
        assert!(selector
            .select(&store, SelectionMode::None, &SelectionRequest::default())
            .is_none());
    }

    #[test]
    fn test_duplicates_collapse_before_limit() {
        let selector = ContextSelector::new(options(2, false));
        let store = chain_store();
        let request = SelectionRequest::selected(["n1", "n1", "n2"]);

        let selection = selector
            .select(&store, SelectionMode::Selected, &request)
            .unwrap();

        assert_eq!(selection.document.node_ids(), vec!["n1", "n2"]);
        assert!(selection.warning.is_none());
    }

    #[test]
    fn test_neighbors_added_after_truncation() {
        let selector = ContextSelector::new(options(1, true));
        let store = chain_store();
        let request = SelectionRequest::visible(["n2", "n4"]);

        let selection = selector
            .select(&store, SelectionMode::Visible, &request)
            .unwrap();

        assert_eq!(selection.document.node_ids(), vec!["n2", "n1", "n3"]);
        assert_eq!(
            selection.warning,
            Some(CapacityWarning {
                requested: 2,
                limit: 1
            })
        );
        assert_eq!(selection.document.relationships.len(), 2);
    }

    #[test]
    fn test_dangling_ids_are_skipped() {
        let selector = ContextSelector::default();
        let store = chain_store();
        let request = SelectionRequest::selected(["n1", "ghost"]);

        let selection = selector
            .select(&store, SelectionMode::Selected, &request)
            .unwrap();

        assert_eq!(selection.document.metadata.node_count, 1);
        assert_eq!(selection.document.node_ids(), vec!["n1"]);
    }

    #[test]
    fn test_neighbor_that_is_not_stored_adds_no_relationship() {
        let store = GraphStore::new();
        store.upsert(
            vec![Node::new("a", "A")],
            vec![Edge::new("e1", "a", "pending")],
        );
        let selector = ContextSelector::new(options(10, true));

        let resolved = store
            .read(|s| selector.resolve_ids(s, SelectionMode::All, &SelectionRequest::default()))
            .unwrap();
        assert_eq!(resolved.ids, vec!["a", "pending"]);

        let selection = selector
            .select(&store, SelectionMode::All, &SelectionRequest::default())
            .unwrap();
        assert_eq!(selection.document.node_ids(), vec!["a"]);
        assert!(selection.document.relationships.is_empty());
    }

    #[test]
    fn test_relationships_and_properties_can_be_excluded() {
        let store = GraphStore::new();
        store.upsert(
            vec![
                Node::new("a", "A").with_property("k", serde_json::json!(1)),
                Node::new("b", "B"),
            ],
            vec![Edge::new("e1", "a", "b")],
        );
        let selector = ContextSelector::new(ContextOptions {
            include_properties: false,
            include_relationships: false,
            ..ContextOptions::default()
        });

        let doc = selector
            .select(&store, SelectionMode::All, &SelectionRequest::default())
            .unwrap()
            .document;

        assert!(doc.relationships.is_empty());
        assert!(doc.nodes.iter().all(|n| n.properties.is_none()));
    }
}
