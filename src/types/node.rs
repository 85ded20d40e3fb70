//! Node type for the client-side graph

use serde::{Deserialize, Serialize};

use super::{NodeId, Properties};

/// Node in the synchronized graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

impl Node {
    /// Create a node with only an id and a label
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: None,
            group: None,
            node_type: None,
            properties: None,
        }
    }

    /// Set the node type
    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    /// Set the group
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Set a single property, creating the property map if needed
    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties
            .get_or_insert_with(Properties::new)
            .insert(key.into(), value);
        self
    }

    /// Label to show to humans; falls back to the id when the label is blank
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_type_field_is_renamed() {
        let node: Node =
            serde_json::from_str(r#"{"id":"n1","label":"A","type":"Person"}"#).unwrap();
        assert_eq!(node.node_type.as_deref(), Some("Person"));

        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains(r#""type":"Person""#));
        assert!(!json.contains("color"));
    }

    #[test]
    fn test_node_missing_label_falls_back_to_id() {
        let node: Node = serde_json::from_str(r#"{"id":"n1"}"#).unwrap();
        assert_eq!(node.label, "");
        assert_eq!(node.display_label(), "n1");
    }

    #[test]
    fn test_with_property() {
        let node = Node::new("n1", "A").with_property("age", json!(42));
        assert_eq!(node.properties.unwrap()["age"], json!(42));
    }
}
