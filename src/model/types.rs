//! Serde types for the diagram JSON the editor hands over.
//!
//! The editor stores arbitrary properties per node; only the fields below
//! are read. Keys may be strings or integers (fresh nodes get negative
//! integer keys) and are normalized to strings here.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramModel {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    #[serde(deserialize_with = "key")]
    pub key: String,
    /// Semantic type name. Older diagrams call this field `type`.
    #[serde(default, alias = "type")]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub is_group: bool,
    #[serde(default, deserialize_with = "optional_key", skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl NodeSpec {
    pub fn new(key: impl Into<String>, name: impl Into<String>, label: impl Into<String>) -> Self {
        NodeSpec {
            key: key.into(),
            name: name.into(),
            label: label.into(),
            is_group: false,
            group: None,
        }
    }

    pub fn cluster(key: impl Into<String>, label: impl Into<String>) -> Self {
        NodeSpec {
            key: key.into(),
            name: String::new(),
            label: label.into(),
            is_group: true,
            group: None,
        }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeSpec {
    #[serde(deserialize_with = "key")]
    pub from: String,
    #[serde(deserialize_with = "key")]
    pub to: String,
}

impl EdgeSpec {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        EdgeSpec {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// The nodes and edges a user selected before asking for validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default, deserialize_with = "keys")]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

impl Selection {
    pub fn new(nodes: Vec<String>, edges: Vec<EdgeSpec>) -> Self {
        Selection { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKey {
    Text(String),
    Int(i64),
}

impl From<RawKey> for String {
    fn from(raw: RawKey) -> Self {
        match raw {
            RawKey::Text(s) => s,
            RawKey::Int(n) => n.to_string(),
        }
    }
}

fn key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawKey::deserialize(deserializer).map(String::from)
}

fn optional_key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawKey>::deserialize(deserializer)?.map(String::from))
}

fn keys<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Vec::<RawKey>::deserialize(deserializer)?
        .into_iter()
        .map(String::from)
        .collect())
}
