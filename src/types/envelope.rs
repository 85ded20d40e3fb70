//! Wire envelopes received on the live update channel

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{Edge, Node};
use crate::error::ProtocolError;

/// Raw heartbeat token sent while connected (not JSON)
pub const PING_TOKEN: &str = "ping";

/// Node/edge batch carried by a `graph_update` envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nodes: Vec<Node>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub edges: Vec<Edge>,
}

/// Explicit `null` reads the same as a missing array
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl UpdatePayload {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Decoded inbound message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    /// Server greeting after the socket opens
    Connected {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Incremental node/edge batch
    GraphUpdate {
        #[serde(default)]
        data: UpdatePayload,
    },

    /// Heartbeat reply
    Pong,
}

impl Envelope {
    /// Decode a raw text frame.
    ///
    /// Fails with [`ProtocolError`] for invalid JSON, a missing `type` tag, an
    /// unknown tag, or a `graph_update` whose data does not match the schema.
    pub fn decode(raw: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(raw).map_err(ProtocolError::Malformed)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingType)?;

        match kind {
            "connected" => Ok(Envelope::Connected {
                message: value
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }),
            "graph_update" => {
                let data = match value.get("data") {
                    None | Some(Value::Null) => UpdatePayload::default(),
                    Some(data) => serde_json::from_value(data.clone())
                        .map_err(ProtocolError::Malformed)?,
                };
                Ok(Envelope::GraphUpdate { data })
            }
            "pong" => Ok(Envelope::Pong),
            other => Err(ProtocolError::UnknownType(other.to_string())),
        }
    }

    /// Wire name of this envelope kind
    pub fn kind(&self) -> &'static str {
        match self {
            Envelope::Connected { .. } => "connected",
            Envelope::GraphUpdate { .. } => "graph_update",
            Envelope::Pong => "pong",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_connected() {
        let env = Envelope::decode(r#"{"type":"connected","message":"hello"}"#).unwrap();
        assert_eq!(
            env,
            Envelope::Connected {
                message: Some("hello".to_string())
            }
        );
    }

    #[test]
    fn test_decode_graph_update() {
        let raw = r#"{"type":"graph_update","data":{"nodes":[{"id":"n1","label":"A"}],"edges":[{"id":"e1","from":"n1","to":"n2"}]}}"#;
        let Envelope::GraphUpdate { data } = Envelope::decode(raw).unwrap() else {
            panic!("expected graph_update");
        };
        assert_eq!(data.nodes.len(), 1);
        assert_eq!(data.edges[0].to, "n2");
    }

    #[test]
    fn test_decode_graph_update_without_data() {
        let env = Envelope::decode(r#"{"type":"graph_update"}"#).unwrap();
        assert!(matches!(env, Envelope::GraphUpdate { data } if data.is_empty()));
    }

    #[test]
    fn test_decode_graph_update_with_null_arrays() {
        let raw = r#"{"type":"graph_update","data":{"nodes":[{"id":"n1","label":"A"}],"edges":null}}"#;
        let Envelope::GraphUpdate { data } = Envelope::decode(raw).unwrap() else {
            panic!("expected graph_update");
        };
        assert_eq!(data.nodes.len(), 1);
        assert!(data.edges.is_empty());

        let raw = r#"{"type":"graph_update","data":{"nodes":null,"edges":[{"from":"a","to":"b"}]}}"#;
        let Envelope::GraphUpdate { data } = Envelope::decode(raw).unwrap() else {
            panic!("expected graph_update");
        };
        assert!(data.nodes.is_empty());
        assert_eq!(data.edges[0].from, "a");
    }

    #[test]
    fn test_decode_pong_with_extra_fields() {
        let env = Envelope::decode(r#"{"type":"pong","ts":1}"#).unwrap();
        assert_eq!(env, Envelope::Pong);
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            Envelope::decode("ping"),
            Err(ProtocolError::Malformed(_))
        ));
        assert!(matches!(
            Envelope::decode(r#"{"message":"x"}"#),
            Err(ProtocolError::MissingType)
        ));
        assert!(matches!(
            Envelope::decode(r#"{"type":"entity_deleted"}"#),
            Err(ProtocolError::UnknownType(t)) if t == "entity_deleted"
        ));
        assert!(matches!(
            Envelope::decode(r#"{"type":"graph_update","data":{"nodes":[{"label":"no id"}]}}"#),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn test_serialized_envelope_decodes() {
        let env = Envelope::GraphUpdate {
            data: UpdatePayload::new(vec![Node::new("a", "A")], vec![]),
        };
        let json = serde_json::to_string(&env).unwrap();
        assert!(json.contains(r#""type":"graph_update""#));
        assert_eq!(Envelope::decode(&json).unwrap(), env);
    }
}
