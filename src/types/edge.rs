//! Edge type for the client-side graph

use serde::{Deserialize, Serialize};

use super::{EdgeId, NodeId, Properties};

/// Directed edge between two nodes
///
/// `from` and `to` may reference nodes that have not been received yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

impl Edge {
    /// Create an edge with an explicit id
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            label: None,
            properties: None,
        }
    }

    /// Set the edge label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Identity used by the store.
    ///
    /// Payloads without an id are keyed by `from|to|label`.
    pub fn key(&self) -> EdgeId {
        if !self.id.is_empty() {
            return self.id.clone();
        }
        format!(
            "{}|{}|{}",
            self.from,
            self.to,
            self.label.as_deref().unwrap_or_default()
        )
    }

    /// Whether `node_id` is either endpoint
    pub fn touches(&self, node_id: &str) -> bool {
        self.from == node_id || self.to == node_id
    }

    /// The endpoint opposite `node_id`, if `node_id` is an endpoint
    pub fn other_end(&self, node_id: &str) -> Option<&str> {
        if self.from == node_id {
            Some(&self.to)
        } else if self.to == node_id {
            Some(&self.from)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_prefers_id() {
        let edge = Edge::new("e1", "a", "b");
        assert_eq!(edge.key(), "e1");
    }

    #[test]
    fn test_key_derived_without_id() {
        let edge: Edge = serde_json::from_str(r#"{"from":"a","to":"b","label":"knows"}"#).unwrap();
        assert_eq!(edge.key(), "a|b|knows");
    }

    #[test]
    fn test_other_end() {
        let edge = Edge::new("e1", "a", "b");
        assert_eq!(edge.other_end("a"), Some("b"));
        assert_eq!(edge.other_end("b"), Some("a"));
        assert_eq!(edge.other_end("c"), None);
        assert!(edge.touches("b"));
    }
}
