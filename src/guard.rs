//! Connection guard: enforces the type rules while edges are being drawn.
//!
//! Runs synchronously for each newly drawn edge. A rejected edge is never
//! inserted, so the diagram stays exactly as it was. Drawing an edge between
//! two nodes with the same semantic name and the same label is a merge
//! gesture: the two physical nodes collapse into one.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::error::Rejection;
use crate::model::{Diagram, Node};
use crate::rules::TypeRules;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Connection {
    /// The edge was inserted.
    Connected { from: String, to: String },
    /// The edge already existed; nothing changed.
    Existing { from: String, to: String },
    /// `removed` was folded into `survivor`; the drawn edge is discarded.
    #[serde(rename_all = "camelCase")]
    Merged {
        survivor: String,
        removed: String,
        repointed_edges: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionGuard {
    rules: TypeRules,
}

impl ConnectionGuard {
    pub fn new(rules: TypeRules) -> Self {
        ConnectionGuard { rules }
    }

    pub fn rules(&self) -> &TypeRules {
        &self.rules
    }

    /// Check a drawn edge without touching the diagram.
    pub fn check(&self, diagram: &Diagram, from: &str, to: &str) -> Result<(), Rejection> {
        let source = diagram
            .node(from)
            .ok_or_else(|| Rejection::UnknownNode(from.to_string()))?;
        let target = diagram
            .node(to)
            .ok_or_else(|| Rejection::UnknownNode(to.to_string()))?;

        if is_duplicate(source, target) {
            if source.kind.is_process() {
                let outputs: BTreeSet<&str> = diagram
                    .successors(from)
                    .into_iter()
                    .chain(diagram.successors(to))
                    .filter(|n| n.kind.is_output_target())
                    .map(|n| n.key.as_str())
                    .collect();
                if outputs.len() > 1 {
                    return Err(too_many_outputs(source));
                }
            }
            return Ok(());
        }

        if !self.rules.permits_kinds(source.kind, target.kind) {
            return Err(Rejection::IllegalConnection {
                from: source.key.clone(),
                to: target.key.clone(),
                from_type: source.logical_name().to_string(),
                to_type: target.logical_name().to_string(),
            });
        }

        if source.kind.is_process() && target.kind.is_output_target() {
            let outputs = diagram
                .successors(from)
                .into_iter()
                .filter(|n| n.kind.is_output_target() && n.key != target.key)
                .count()
                + 1;
            if outputs > 1 {
                return Err(too_many_outputs(source));
            }
        }

        Ok(())
    }

    /// Apply a drawn edge: reject it, insert it, or merge its endpoints.
    pub fn connect(
        &self,
        diagram: &mut Diagram,
        from: &str,
        to: &str,
    ) -> Result<Connection, Rejection> {
        if let Err(rejection) = self.check(diagram, from, to) {
            debug!(from, to, code = rejection.code(), "connection rejected: {}", rejection);
            return Err(rejection);
        }

        let merge = match (diagram.node(from), diagram.node(to)) {
            (Some(source), Some(target)) => is_duplicate(source, target),
            _ => false,
        };
        if merge {
            let repointed_edges = diagram
                .merge_nodes(from, to)
                .ok_or_else(|| Rejection::UnknownNode(to.to_string()))?;
            debug!(survivor = from, removed = to, repointed_edges, "merged duplicate nodes");
            return Ok(Connection::Merged {
                survivor: from.to_string(),
                removed: to.to_string(),
                repointed_edges,
            });
        }

        let (from, to) = (from.to_string(), to.to_string());
        if diagram.insert_edge(&from, &to) {
            Ok(Connection::Connected { from, to })
        } else {
            Ok(Connection::Existing { from, to })
        }
    }
}

fn too_many_outputs(process: &Node) -> Rejection {
    Rejection::TooManyOutputs {
        process: process.key.clone(),
        process_type: process.logical_name().to_string(),
        label: process.label.trim().to_string(),
    }
}

/// Same semantic name and same label on two distinct physical nodes.
fn is_duplicate(source: &Node, target: &Node) -> bool {
    source.key != target.key
        && source.is_semantic()
        && target.is_semantic()
        && source.logical_name() == target.logical_name()
        && source.label.trim() == target.label.trim()
}

/// Apply a drawn edge with the canonical type rules.
pub fn connect(diagram: &mut Diagram, from: &str, to: &str) -> Result<Connection, Rejection> {
    ConnectionGuard::default().connect(diagram, from, to)
}
