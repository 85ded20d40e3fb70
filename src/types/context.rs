//! Context document types attached to user queries

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Edge, Node, NodeId, Properties};

/// Policy deciding which nodes form the base of a context selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Explicit ids chosen by the user
    Selected,
    /// Ids currently inside the viewport
    Visible,
    /// Every node in the store
    All,
    /// No context
    #[default]
    None,
}

impl SelectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::Selected => "selected",
            SelectionMode::Visible => "visible",
            SelectionMode::All => "all",
            SelectionMode::None => "none",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SelectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "selected" => Ok(SelectionMode::Selected),
            "visible" => Ok(SelectionMode::Visible),
            "all" => Ok(SelectionMode::All),
            "none" => Ok(SelectionMode::None),
            other => Err(format!("unknown selection mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMetadata {
    pub mode: SelectionMode,
    pub node_count: usize,
    /// ISO 8601 creation time
    pub timestamp: String,
}

/// Node as it appears in a context document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub id: NodeId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
}

impl NodeSummary {
    pub fn from_node(node: &Node, include_properties: bool) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            properties: if include_properties {
                node.properties.clone()
            } else {
                None
            },
            group: node.group.clone(),
            node_type: node.node_type.clone(),
        }
    }
}

/// Edge as it appears in a context document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSummary {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

impl EdgeSummary {
    pub fn from_edge(edge: &Edge, include_properties: bool) -> Self {
        Self {
            from: edge.from.clone(),
            to: edge.to.clone(),
            label: edge.label.clone(),
            properties: if include_properties {
                edge.properties.clone()
            } else {
                None
            },
        }
    }
}

/// Bounded subgraph produced for one selection request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextDocument {
    pub metadata: ContextMetadata,
    pub nodes: Vec<NodeSummary>,
    pub relationships: Vec<EdgeSummary>,
}

impl ContextDocument {
    /// Ids of the nodes in document order
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    pub fn find_node(&self, id: &str) -> Option<&NodeSummary> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Raised when a base selection exceeds the configured node limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityWarning {
    pub requested: usize,
    pub limit: usize,
}

impl fmt::Display for CapacityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "selection of {} nodes exceeds the context limit; only the first {} were kept",
            self.requested, self.limit
        )
    }
}
