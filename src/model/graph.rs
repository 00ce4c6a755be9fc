//! petgraph-backed directed graph of the Boxology diagram.
//!
//! Built once from a [`DiagramModel`]; node data is validated and classified
//! here so later stages never re-check it. A stable graph is used because the
//! connection guard deletes nodes when it merges duplicates.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use serde::Serialize;

use super::types::{DiagramModel, EdgeSpec, NodeSpec};
use crate::error::BoxologyError;
use crate::vocab::{BoxType, NodeKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub key: String,
    /// Raw semantic name as drawn.
    pub name: String,
    pub label: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Node {
    pub fn from_spec(spec: &NodeSpec) -> Self {
        Node {
            key: spec.key.clone(),
            name: spec.name.clone(),
            label: spec.label.clone(),
            kind: NodeKind::classify(&spec.name, &spec.label, spec.is_group),
            group: spec.group.clone(),
        }
    }

    pub fn box_type(&self) -> Option<BoxType> {
        self.kind.box_type()
    }

    pub fn is_semantic(&self) -> bool {
        self.kind.is_semantic()
    }

    /// Name of the logical node this physical node belongs to. Recognized
    /// types use the canonical spelling so `train` and `Train` coincide.
    pub fn logical_name(&self) -> &str {
        match self.kind.box_type() {
            Some(ty) => ty.as_str(),
            None => self.name.trim(),
        }
    }

    /// Human-facing name: the label when it adds information, else the type.
    pub fn display_name(&self) -> String {
        let label = self.label.trim();
        if label.is_empty() || label == self.logical_name() {
            self.logical_name().to_string()
        } else {
            format!("{} \"{}\"", self.logical_name(), label)
        }
    }

    fn to_spec(&self) -> NodeSpec {
        NodeSpec {
            key: self.key.clone(),
            name: self.name.clone(),
            label: self.label.clone(),
            is_group: self.kind == NodeKind::Group,
            group: self.group.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagram {
    pub graph: StableDiGraph<Node, ()>,
    pub node_indices: HashMap<String, NodeIndex>,
}

impl Diagram {
    pub fn build(model: &DiagramModel) -> Result<Self, Vec<BoxologyError>> {
        let mut graph = StableDiGraph::new();
        let mut node_indices = HashMap::new();
        let mut errors = Vec::new();

        for spec in &model.nodes {
            if node_indices.contains_key(&spec.key) {
                errors.push(BoxologyError::parse(
                    "P003",
                    format!("Duplicate node key '{}'", spec.key),
                    Some(spec.key.clone()),
                ));
                continue;
            }
            let idx = graph.add_node(Node::from_spec(spec));
            node_indices.insert(spec.key.clone(), idx);
        }

        for spec in &model.nodes {
            let Some(group) = &spec.group else { continue };
            let is_cluster = node_indices
                .get(group)
                .is_some_and(|&idx| graph[idx].kind == NodeKind::Group);
            if !is_cluster {
                errors.push(BoxologyError::parse(
                    "P004",
                    format!(
                        "Node '{}' belongs to '{}', which is not a group in this diagram",
                        spec.key, group
                    ),
                    Some(spec.key.clone()),
                ));
            }
        }

        for edge in &model.edges {
            match (node_indices.get(&edge.from), node_indices.get(&edge.to)) {
                (Some(&s), Some(&t)) => {
                    // Edges only exist or don't; repeats collapse.
                    if graph.find_edge(s, t).is_none() {
                        graph.add_edge(s, t, ());
                    }
                }
                (None, _) => {
                    errors.push(BoxologyError::parse(
                        "P002",
                        format!(
                            "Edge '{}' -> '{}' references unknown source node '{}'",
                            edge.from, edge.to, edge.from
                        ),
                        None,
                    ));
                }
                (_, None) => {
                    errors.push(BoxologyError::parse(
                        "P002",
                        format!(
                            "Edge '{}' -> '{}' references unknown target node '{}'",
                            edge.from, edge.to, edge.to
                        ),
                        None,
                    ));
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Diagram {
            graph,
            node_indices,
        })
    }

    pub fn node(&self, key: &str) -> Option<&Node> {
        self.node_indices.get(key).map(|&idx| &self.graph[idx])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    pub fn edges(&self) -> impl Iterator<Item = (&Node, &Node)> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(s, t)| (&self.graph[s], &self.graph[t]))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_indices.get(from), self.node_indices.get(to)) {
            (Some(&s), Some(&t)) => self.graph.find_edge(s, t).is_some(),
            _ => false,
        }
    }

    pub fn successors(&self, key: &str) -> Vec<&Node> {
        self.neighbors(key, Direction::Outgoing)
    }

    pub fn predecessors(&self, key: &str) -> Vec<&Node> {
        self.neighbors(key, Direction::Incoming)
    }

    pub fn outgoing_count(&self, key: &str) -> usize {
        self.successors(key).len()
    }

    pub fn incoming_count(&self, key: &str) -> usize {
        self.predecessors(key).len()
    }

    /// Edges touching `key` in either direction, anywhere in the diagram.
    pub fn incident_count(&self, key: &str) -> usize {
        self.incoming_count(key) + self.outgoing_count(key)
    }

    /// Serialize back to the editor's shape, e.g. after the guard merged nodes.
    pub fn to_model(&self) -> DiagramModel {
        DiagramModel {
            nodes: self.nodes().map(Node::to_spec).collect(),
            edges: self
                .edges()
                .map(|(from, to)| EdgeSpec::new(from.key.clone(), to.key.clone()))
                .collect(),
        }
    }

    fn neighbors(&self, key: &str, direction: Direction) -> Vec<&Node> {
        let Some(&idx) = self.node_indices.get(key) else {
            return vec![];
        };
        self.graph
            .neighbors_directed(idx, direction)
            .map(|n| &self.graph[n])
            .collect()
    }

    /// Insert `from -> to`. Returns false if either key is unknown or the
    /// edge already exists.
    pub(crate) fn insert_edge(&mut self, from: &str, to: &str) -> bool {
        let (Some(&s), Some(&t)) = (self.node_indices.get(from), self.node_indices.get(to)) else {
            return false;
        };
        if self.graph.find_edge(s, t).is_some() {
            return false;
        }
        self.graph.add_edge(s, t, ());
        true
    }

    /// Fold `removed` into `survivor`: every edge of `removed` not already
    /// mirrored on `survivor` is re-pointed, edges between the two vanish,
    /// and `removed` is deleted. Returns the number of re-pointed edges.
    pub(crate) fn merge_nodes(&mut self, survivor: &str, removed: &str) -> Option<usize> {
        let (Some(&keep), Some(&gone)) =
            (self.node_indices.get(survivor), self.node_indices.get(removed))
        else {
            return None;
        };
        if keep == gone {
            return None;
        }

        let others = |direction| -> Vec<NodeIndex> {
            self.graph
                .neighbors_directed(gone, direction)
                .filter(|&n| n != keep && n != gone)
                .collect()
        };
        let sources = others(Direction::Incoming);
        let targets = others(Direction::Outgoing);

        self.graph.remove_node(gone);
        self.node_indices.remove(removed);

        let mut repointed = 0;
        for source in sources {
            if self.graph.find_edge(source, keep).is_none() {
                self.graph.add_edge(source, keep, ());
                repointed += 1;
            }
        }
        for target in targets {
            if self.graph.find_edge(keep, target).is_none() {
                self.graph.add_edge(keep, target, ());
                repointed += 1;
            }
        }
        Some(repointed)
    }
}
