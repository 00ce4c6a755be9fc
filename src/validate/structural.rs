//! Structural diagnostics over the validated scope.
//!
//! Each check is independent: a node can be unmatched, isolated and
//! disconnected at the same time.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use super::identity::LogicalNodes;
use super::matcher::ScopedEdge;
use crate::model::{Diagram, Node};

/// Physical node reference as it appears in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRef {
    pub key: String,
    pub name: String,
    pub label: String,
}

impl NodeRef {
    pub fn of(node: &Node) -> Self {
        NodeRef {
            key: node.key.clone(),
            name: node.logical_name().to_string(),
            label: node.label.trim().to_string(),
        }
    }

    pub fn display_name(&self) -> String {
        if self.label.is_empty() || self.label == self.name {
            self.name.clone()
        } else {
            format!("{} \"{}\"", self.name, self.label)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Cardinality {
    TooManyOutputs { count: usize },
    MissingOutput,
    MissingInput,
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cardinality::TooManyOutputs { count } => write!(f, "too many outputs ({})", count),
            Cardinality::MissingOutput => write!(f, "missing output"),
            Cardinality::MissingInput => write!(f, "missing input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardinalityViolation {
    pub node: NodeRef,
    pub violation: Cardinality,
}

/// Logical names with no instance among the pattern participants.
pub fn unmatched_nodes(logical: &LogicalNodes, participating: &BTreeSet<String>) -> Vec<String> {
    logical
        .names()
        .filter(|name| !participating.contains(*name))
        .map(str::to_string)
        .collect()
}

/// Logical names where no physical instance anywhere in the diagram has an
/// incident edge. Deliberately global, even when validating a selection.
pub fn isolated_nodes(logical: &LogicalNodes, diagram: &Diagram) -> Vec<String> {
    let mut connected: HashMap<&str, bool> = HashMap::new();
    for node in diagram.nodes().filter(|n| n.is_semantic()) {
        let entry = connected.entry(node.logical_name()).or_insert(false);
        *entry |= diagram.incident_count(&node.key) > 0;
    }

    logical
        .names()
        .filter(|name| !connected.get(name).copied().unwrap_or(false))
        .map(str::to_string)
        .collect()
}

/// Physical nodes with no incident edge inside the scope.
pub fn disconnected_nodes(nodes: &[&Node], edges: &[ScopedEdge<'_>]) -> Vec<NodeRef> {
    let touched: BTreeSet<&str> = edges
        .iter()
        .flat_map(|e| [e.from.key.as_str(), e.to.key.as_str()])
        .collect();

    nodes
        .iter()
        .filter(|n| !touched.contains(n.key.as_str()))
        .map(|n| NodeRef::of(n))
        .collect()
}

/// Every process must consume something and produce exactly one artifact.
/// Outputs are counted within the scope; inputs anywhere in the diagram.
pub fn cardinality_violations(
    diagram: &Diagram,
    nodes: &[&Node],
    edges: &[ScopedEdge<'_>],
) -> Vec<CardinalityViolation> {
    let mut violations = Vec::new();

    for node in nodes.iter().filter(|n| n.kind.is_process()) {
        let outputs = edges
            .iter()
            .filter(|e| e.from.key == node.key && e.to.kind.is_output_target())
            .count();
        let inputs = diagram
            .predecessors(&node.key)
            .into_iter()
            .filter(|n| n.is_semantic())
            .count();

        let output_issue = match outputs {
            0 => Some(Cardinality::MissingOutput),
            1 => None,
            count => Some(Cardinality::TooManyOutputs { count }),
        };
        if let Some(violation) = output_issue {
            violations.push(CardinalityViolation {
                node: NodeRef::of(node),
                violation,
            });
        }
        if inputs == 0 {
            violations.push(CardinalityViolation {
                node: NodeRef::of(node),
                violation: Cardinality::MissingInput,
            });
        }
    }

    violations
}
