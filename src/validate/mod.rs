//! Pattern validation of a Boxology diagram or a selection of it.
//!
//! Pipeline: identity resolution → legality check → pattern matching →
//! structural diagnostics → verdict. Validation only reads the diagram.

pub mod identity;
pub mod matcher;
pub mod report;
pub mod structural;

pub use identity::LogicalNodes;
pub use matcher::{MatchOutcome, PatternMatch, Roles, ScopedEdge};
pub use report::{IllegalConnection, Scope, ValidationReport, Verdict};
pub use structural::{Cardinality, CardinalityViolation, NodeRef};

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::error::ValidateError;
use crate::model::{Diagram, Node, Selection};
use crate::rules::RuleSet;

/// Share of logical nodes a diagram needs covered to count as partially valid.
const PARTIAL_COVERAGE: f64 = 50.0;

#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: RuleSet,
}

impl Validator {
    pub fn new(rules: RuleSet) -> Self {
        Validator { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Validate only what the user selected. Isolation is still judged
    /// against the whole diagram.
    #[instrument(level = "trace", skip_all)]
    pub fn validate_selection(
        &self,
        diagram: &Diagram,
        selection: &Selection,
    ) -> Result<ValidationReport, ValidateError> {
        if selection.nodes.is_empty() {
            return Err(ValidateError::EmptySelection);
        }

        let mut seen = HashSet::new();
        let mut selected = Vec::new();
        for key in &selection.nodes {
            let node = diagram
                .node(key)
                .ok_or_else(|| ValidateError::UnknownNode(key.clone()))?;
            if seen.insert(key.as_str()) {
                selected.push(node);
            }
        }
        for edge in &selection.edges {
            if !diagram.contains_edge(&edge.from, &edge.to) {
                return Err(ValidateError::UnknownEdge {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                });
            }
        }

        let logical = LogicalNodes::resolve(selected.iter().copied());
        if logical.is_empty() {
            return Err(ValidateError::EmptySelection);
        }
        let nodes: Vec<&Node> = selected.into_iter().filter(|n| n.is_semantic()).collect();

        let mut seen_edges = HashSet::new();
        let edges: Vec<ScopedEdge<'_>> = selection
            .edges
            .iter()
            .filter(|e| logical.contains_key(&e.from) && logical.contains_key(&e.to))
            .filter(|e| seen_edges.insert((e.from.as_str(), e.to.as_str())))
            .filter_map(|e| Some(ScopedEdge::new(diagram.node(&e.from)?, diagram.node(&e.to)?)))
            .collect();

        Ok(self.run(Scope::Selection, diagram, &nodes, &edges, &logical))
    }

    /// Validate every node and edge of the diagram.
    #[instrument(level = "trace", skip_all)]
    pub fn validate_whole(&self, diagram: &Diagram) -> Result<ValidationReport, ValidateError> {
        let logical = LogicalNodes::resolve(diagram.nodes());
        if logical.is_empty() {
            return Err(ValidateError::EmptyDiagram);
        }

        let nodes: Vec<&Node> = diagram.nodes().filter(|n| n.is_semantic()).collect();
        let edges: Vec<ScopedEdge<'_>> = diagram
            .edges()
            .filter(|(from, to)| from.is_semantic() && to.is_semantic())
            .map(|(from, to)| ScopedEdge::new(from, to))
            .collect();

        Ok(self.run(Scope::Diagram, diagram, &nodes, &edges, &logical))
    }

    fn run(
        &self,
        scope: Scope,
        diagram: &Diagram,
        nodes: &[&Node],
        edges: &[ScopedEdge<'_>],
        logical: &LogicalNodes,
    ) -> ValidationReport {
        // Applied to both scopes: edges can enter the diagram without
        // passing through the connection guard (imports, programmatic edits).
        let illegal: Vec<IllegalConnection> = edges
            .iter()
            .filter(|e| !self.rules.type_rules.permits_kinds(e.from.kind, e.to.kind))
            .map(|e| IllegalConnection {
                from: NodeRef::of(e.from),
                to: NodeRef::of(e.to),
            })
            .collect();
        if !illegal.is_empty() {
            debug!(?scope, count = illegal.len(), "illegal connections, skipping pattern matching");
            return ValidationReport::invalid_connections(scope, logical.len(), illegal);
        }

        let outcome = matcher::match_patterns(&self.rules.patterns, edges, logical);

        let unmatched = structural::unmatched_nodes(logical, &outcome.participating);
        let isolated = structural::isolated_nodes(logical, diagram);
        let disconnected = structural::disconnected_nodes(nodes, edges);
        let cardinality = structural::cardinality_violations(diagram, nodes, edges);

        let matched_node_count = logical
            .names()
            .filter(|name| outcome.participating.contains(*name))
            .count();
        let coverage = matched_node_count as f64 * 100.0 / logical.len() as f64;

        let matched_any = !outcome.matches.is_empty();
        let clean = unmatched.is_empty()
            && isolated.is_empty()
            && disconnected.is_empty()
            && cardinality.is_empty();
        let verdict = if matched_any && clean {
            Verdict::Valid
        } else if scope == Scope::Diagram && matched_any && coverage >= PARTIAL_COVERAGE {
            Verdict::PartiallyValid
        } else {
            Verdict::Invalid
        };

        debug!(?scope, %verdict, coverage, matches = outcome.matches.len(), "validation finished");

        ValidationReport {
            scope,
            verdict,
            coverage,
            logical_node_count: logical.len(),
            matched_node_count,
            matches: outcome.matches,
            unmatched,
            isolated,
            disconnected,
            cardinality,
            illegal_connections: Vec::new(),
        }
    }
}

/// Validate the whole diagram with the canonical rule set.
pub fn validate_diagram(diagram: &Diagram) -> Result<ValidationReport, ValidateError> {
    Validator::default().validate_whole(diagram)
}

/// Validate a selection with the canonical rule set.
pub fn validate_selection(
    diagram: &Diagram,
    selection: &Selection,
) -> Result<ValidationReport, ValidateError> {
    Validator::default().validate_selection(diagram, selection)
}
