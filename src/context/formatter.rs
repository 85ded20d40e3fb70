//! Rendering of context documents
//!
//! Both renderers are pure functions of the document.

use std::fmt::Write as _;

use serde_json::Value;

use crate::types::{ContextDocument, NodeSummary, Properties};

/// Properties shown per node in text form
pub const MAX_TEXT_PROPERTIES: usize = 5;

/// Characters kept from each property value in text form
pub const MAX_PROPERTY_VALUE_CHARS: usize = 100;

/// Human-readable rendering for prompt injection
pub fn to_text(doc: &ContextDocument) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Graph context (mode: {}, nodes: {})",
        doc.metadata.mode, doc.metadata.node_count
    );

    if !doc.nodes.is_empty() {
        out.push_str("\nNodes:\n");
        for node in &doc.nodes {
            out.push_str("- ");
            out.push_str(node_label(node));
            if let Some(node_type) = &node.node_type {
                let _ = write!(out, " ({})", node_type);
            }
            if let Some(props) = node.properties.as_ref().filter(|p| !p.is_empty()) {
                let _ = write!(out, " {{{}}}", format_properties(props));
            }
            out.push('\n');
        }
    }

    if !doc.relationships.is_empty() {
        out.push_str("\nRelationships:\n");
        for rel in &doc.relationships {
            let from = doc.find_node(&rel.from).map_or(rel.from.as_str(), node_label);
            let to = doc.find_node(&rel.to).map_or(rel.to.as_str(), node_label);
            let _ = write!(out, "- {} → {}", from, to);
            if let Some(label) = &rel.label {
                let _ = write!(out, " [{}]", label);
            }
            out.push('\n');
        }
    }

    out
}

/// Canonical structured form, unfiltered
pub fn to_json(doc: &ContextDocument) -> serde_json::Result<String> {
    serde_json::to_string_pretty(doc)
}

/// Parse a document produced by [`to_json`]
pub fn from_json(json: &str) -> serde_json::Result<ContextDocument> {
    serde_json::from_str(json)
}

fn node_label(node: &NodeSummary) -> &str {
    if node.label.trim().is_empty() {
        &node.id
    } else {
        &node.label
    }
}

fn format_properties(props: &Properties) -> String {
    let mut parts: Vec<String> = props
        .iter()
        .take(MAX_TEXT_PROPERTIES)
        .map(|(key, value)| format!("{}: {}", key, format_value(value)))
        .collect();

    if props.len() > MAX_TEXT_PROPERTIES {
        parts.push(format!("+{} more", props.len() - MAX_TEXT_PROPERTIES));
    }
    parts.join(", ")
}

fn format_value(value: &Value) -> String {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    truncate_chars(&raw, MAX_PROPERTY_VALUE_CHARS)
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max).collect();
    truncated.push('…');
    truncated
}
