//! Validation report and its text rendering.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use super::matcher::PatternMatch;
use super::structural::{CardinalityViolation, NodeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Scope {
    Selection,
    Diagram,
}

impl Scope {
    fn subject(self) -> &'static str {
        match self {
            Scope::Selection => "Selection",
            Scope::Diagram => "Diagram",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    #[serde(rename = "VALID")]
    Valid,
    #[serde(rename = "PARTIALLY VALID")]
    PartiallyValid,
    #[serde(rename = "INVALID")]
    Invalid,
    #[serde(rename = "INVALID CONNECTIONS")]
    InvalidConnections,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Valid => "VALID",
            Verdict::PartiallyValid => "PARTIALLY VALID",
            Verdict::Invalid => "INVALID",
            Verdict::InvalidConnections => "INVALID CONNECTIONS",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An edge whose endpoint types the type rules do not permit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IllegalConnection {
    pub from: NodeRef,
    pub to: NodeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub scope: Scope,
    pub verdict: Verdict,
    /// Percentage of logical nodes covered by at least one pattern.
    pub coverage: f64,
    pub logical_node_count: usize,
    pub matched_node_count: usize,
    pub matches: Vec<PatternMatch>,
    pub unmatched: Vec<String>,
    pub isolated: Vec<String>,
    pub disconnected: Vec<NodeRef>,
    pub cardinality: Vec<CardinalityViolation>,
    pub illegal_connections: Vec<IllegalConnection>,
}

impl ValidationReport {
    pub(crate) fn invalid_connections(
        scope: Scope,
        logical_node_count: usize,
        illegal_connections: Vec<IllegalConnection>,
    ) -> Self {
        ValidationReport {
            scope,
            verdict: Verdict::InvalidConnections,
            coverage: 0.0,
            logical_node_count,
            matched_node_count: 0,
            matches: Vec::new(),
            unmatched: Vec::new(),
            isolated: Vec::new(),
            disconnected: Vec::new(),
            cardinality: Vec::new(),
            illegal_connections,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.verdict == Verdict::Valid
    }

    pub fn has_structural_issues(&self) -> bool {
        !(self.unmatched.is_empty()
            && self.isolated.is_empty()
            && self.disconnected.is_empty()
            && self.cardinality.is_empty())
    }

    /// Matched pattern name → every logical node involved in any instance.
    pub fn matched_patterns(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut summary: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for m in &self.matches {
            summary
                .entry(m.pattern.clone())
                .or_default()
                .extend(m.nodes.iter().cloned());
        }
        summary
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        let subject = self.scope.subject();

        if self.verdict == Verdict::InvalidConnections {
            lines.push(format!("{} has invalid connections:", subject));
            for c in &self.illegal_connections {
                lines.push(format!(
                    "  - {} -> {}",
                    c.from.display_name(),
                    c.to.display_name()
                ));
            }
            return lines.join("\n");
        }

        lines.push(format!(
            "{} is {} (coverage {:.1}%, {} of {} logical nodes matched).",
            subject, self.verdict, self.coverage, self.matched_node_count, self.logical_node_count
        ));

        if self.matches.is_empty() {
            lines.push("No patterns matched.".to_string());
        } else {
            lines.push("Matched patterns:".to_string());
            for (name, count, nodes) in self.pattern_summary() {
                let nodes = nodes.into_iter().collect::<Vec<_>>().join(", ");
                if count > 1 {
                    lines.push(format!("  - {} x{}: {}", name, count, nodes));
                } else {
                    lines.push(format!("  - {}: {}", name, nodes));
                }
            }
        }

        if self.has_structural_issues() {
            lines.push("Issues:".to_string());
            if !self.unmatched.is_empty() {
                lines.push(format!(
                    "  - Unmatched logical nodes: {}",
                    self.unmatched.join(", ")
                ));
            }
            if !self.isolated.is_empty() {
                lines.push(format!(
                    "  - Isolated logical nodes: {}",
                    self.isolated.join(", ")
                ));
            }
            if !self.disconnected.is_empty() {
                let names: Vec<String> =
                    self.disconnected.iter().map(NodeRef::display_name).collect();
                lines.push(format!("  - Disconnected nodes: {}", names.join(", ")));
            }
            for c in &self.cardinality {
                lines.push(format!("  - {}: {}", c.node.display_name(), c.violation));
            }
        }

        lines.join("\n")
    }

    /// Patterns in first-match (catalog) order with instance counts.
    fn pattern_summary(&self) -> Vec<(&str, usize, BTreeSet<&str>)> {
        let mut summary: Vec<(&str, usize, BTreeSet<&str>)> = Vec::new();
        for m in &self.matches {
            let pos = match summary.iter().position(|(name, _, _)| *name == m.pattern) {
                Some(pos) => pos,
                None => {
                    summary.push((m.pattern.as_str(), 0, BTreeSet::new()));
                    summary.len() - 1
                }
            };
            let entry = &mut summary[pos];
            entry.1 += 1;
            entry.2.extend(m.nodes.iter().map(String::as_str));
        }
        summary
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
