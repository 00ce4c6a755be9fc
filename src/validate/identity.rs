//! Node identity resolution: physical nodes → logical nodes.
//!
//! Annotation and group nodes are dropped; every remaining physical node maps
//! to the logical node named by its semantic type.

use std::collections::{BTreeMap, HashMap};

use crate::model::Node;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalNodes {
    by_key: HashMap<String, String>,
    members: BTreeMap<String, Vec<String>>,
}

impl LogicalNodes {
    pub fn resolve<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        let mut resolved = LogicalNodes::default();
        for node in nodes.into_iter().filter(|n| n.is_semantic()) {
            let name = node.logical_name().to_string();
            resolved.by_key.insert(node.key.clone(), name.clone());
            resolved.members.entry(name).or_default().push(node.key.clone());
        }
        resolved
    }

    pub fn logical_name(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Logical names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// Number of logical nodes.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
