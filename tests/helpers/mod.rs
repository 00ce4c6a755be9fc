use boxology::model::{Diagram, DiagramModel, EdgeSpec, NodeSpec, Selection};
use boxology::validate::{LogicalNodes, ScopedEdge};

// =============================================================================
// Diagram builders
// =============================================================================

pub fn node(key: &str, name: &str, label: &str) -> NodeSpec {
    NodeSpec::new(key, name, label)
}

pub fn edge(from: &str, to: &str) -> EdgeSpec {
    EdgeSpec::new(from, to)
}

pub fn model(nodes: Vec<NodeSpec>, edges: &[(&str, &str)]) -> DiagramModel {
    DiagramModel {
        nodes,
        edges: edges.iter().map(|(f, t)| edge(f, t)).collect(),
    }
}

pub fn diagram(nodes: Vec<NodeSpec>, edges: &[(&str, &str)]) -> Diagram {
    Diagram::build(&model(nodes, edges)).expect("diagram should build")
}

/// One node per distinct type name, keyed and named by that type, wired
/// with the given typed edges.
pub fn typed_diagram(edges: &[(&str, &str)]) -> Diagram {
    let mut nodes: Vec<NodeSpec> = Vec::new();
    for (from, to) in edges {
        for name in [from, to] {
            if !nodes.iter().any(|n| n.key == *name) {
                nodes.push(node(name, name, ""));
            }
        }
    }
    diagram(nodes, edges)
}

pub fn fixture(json: &str) -> Diagram {
    boxology::model::parse_and_build(json).expect("fixture should build")
}

// =============================================================================
// Selection / scope helpers
// =============================================================================

pub fn select(nodes: &[&str], edges: &[(&str, &str)]) -> Selection {
    Selection::new(
        nodes.iter().map(|k| k.to_string()).collect(),
        edges.iter().map(|(f, t)| edge(f, t)).collect(),
    )
}

pub fn select_all(diagram: &Diagram) -> Selection {
    Selection::new(
        diagram.nodes().map(|n| n.key.clone()).collect(),
        diagram
            .edges()
            .map(|(f, t)| edge(&f.key, &t.key))
            .collect(),
    )
}

/// Every edge between semantic nodes, in insertion order, plus the logical
/// node table, as the validator would scope a whole diagram.
pub fn scope(diagram: &Diagram) -> (Vec<ScopedEdge<'_>>, LogicalNodes) {
    let edges = diagram
        .edges()
        .filter(|(f, t)| f.is_semantic() && t.is_semantic())
        .map(|(f, t)| ScopedEdge::new(f, t))
        .collect();
    (edges, LogicalNodes::resolve(diagram.nodes()))
}
