//! Greedy multi-pattern matcher.
//!
//! Patterns are tried in catalog order. For each pattern the matcher keeps
//! taking the first unused edge for every template in sequence; a complete
//! pick becomes an instance and its edges are consumed for the rest of the
//! run. There is no backtracking across patterns, so an edge claimed early is
//! lost to later patterns even when that would cover more nodes.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::trace;

use super::identity::LogicalNodes;
use crate::model::Node;
use crate::rules::{Pattern, PatternCatalog};
use crate::vocab::BoxType;

/// An edge inside the validated scope, with both endpoints resolved.
#[derive(Debug, Clone, Copy)]
pub struct ScopedEdge<'a> {
    pub from: &'a Node,
    pub to: &'a Node,
}

impl<'a> ScopedEdge<'a> {
    pub fn new(from: &'a Node, to: &'a Node) -> Self {
        ScopedEdge { from, to }
    }

    /// Endpoint types, when both are recognized.
    pub fn types(&self) -> Option<(BoxType, BoxType)> {
        Some((self.from.box_type()?, self.to.box_type()?))
    }
}

/// Input/process/output decomposition of one pattern instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roles {
    pub inputs: BTreeSet<String>,
    pub processes: BTreeSet<String>,
    pub outputs: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternMatch {
    pub pattern: String,
    /// Logical nodes touched by the instance.
    pub nodes: BTreeSet<String>,
    /// Consumed physical edges as `(from key, to key)`, in template order.
    pub edges: Vec<(String, String)>,
    pub roles: Roles,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    pub matches: Vec<PatternMatch>,
    /// Indices into the matched edge slice.
    pub used_edges: BTreeSet<usize>,
    /// Logical nodes confirmed in at least one instance.
    pub participating: BTreeSet<String>,
}

pub fn match_patterns(
    catalog: &PatternCatalog,
    edges: &[ScopedEdge<'_>],
    logical: &LogicalNodes,
) -> MatchOutcome {
    let mut outcome = MatchOutcome::default();

    for pattern in catalog.iter() {
        while let Some(picked) = find_instance(pattern, edges, &outcome.used_edges) {
            outcome.used_edges.extend(picked.iter().copied());
            let instance = build_instance(pattern, &picked, edges, logical);
            trace!(pattern = %pattern.name, nodes = ?instance.nodes, "pattern instance committed");
            outcome.participating.extend(instance.nodes.iter().cloned());
            outcome.matches.push(instance);
        }
    }

    outcome
}

/// One pick per template, each an edge not yet consumed and not already
/// picked for this attempt.
fn find_instance(
    pattern: &Pattern,
    edges: &[ScopedEdge<'_>],
    used: &BTreeSet<usize>,
) -> Option<Vec<usize>> {
    let mut picked = Vec::with_capacity(pattern.edges.len());
    for &template in &pattern.edges {
        let idx = (0..edges.len()).find(|i| {
            !used.contains(i) && !picked.contains(i) && edges[*i].types() == Some(template)
        })?;
        picked.push(idx);
    }
    Some(picked)
}

fn build_instance(
    pattern: &Pattern,
    picked: &[usize],
    edges: &[ScopedEdge<'_>],
    logical: &LogicalNodes,
) -> PatternMatch {
    let name_of = |node: &Node| -> String {
        logical
            .logical_name(&node.key)
            .unwrap_or_else(|| node.logical_name())
            .to_string()
    };

    let mut nodes = BTreeSet::new();
    let mut roles = Roles::default();
    let mut consumed = Vec::with_capacity(picked.len());

    for &idx in picked {
        let edge = edges[idx];
        let (from, to) = (name_of(edge.from), name_of(edge.to));
        if edge.to.kind.is_process() {
            roles.inputs.insert(from.clone());
            roles.processes.insert(to.clone());
        }
        if edge.from.kind.is_process() {
            roles.processes.insert(from.clone());
            roles.outputs.insert(to.clone());
        }
        nodes.insert(from);
        nodes.insert(to);
        consumed.push((edge.from.key.clone(), edge.to.key.clone()));
    }

    PatternMatch {
        pattern: pattern.name.clone(),
        nodes,
        edges: consumed,
        roles,
    }
}
