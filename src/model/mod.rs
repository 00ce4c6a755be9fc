//! Ingestion: diagram JSON → typed nodes and a validated graph.

pub mod graph;
pub mod types;

pub use graph::{Diagram, Node};
pub use types::*;

use crate::error::BoxologyError;

/// Deserialize a diagram JSON string into a `DiagramModel`.
pub fn parse(json: &str) -> Result<DiagramModel, Vec<BoxologyError>> {
    serde_json::from_str::<DiagramModel>(json).map_err(|e| {
        vec![BoxologyError::parse(
            "P001",
            format!("Failed to parse diagram JSON: {}", e),
            None,
        )]
    })
}

/// Parse JSON and build the diagram graph in one step.
pub fn parse_and_build(json: &str) -> Result<Diagram, Vec<BoxologyError>> {
    let model = parse(json)?;
    Diagram::build(&model)
}

/// Deserialize a selection JSON string.
pub fn parse_selection(json: &str) -> Result<Selection, Vec<BoxologyError>> {
    serde_json::from_str::<Selection>(json).map_err(|e| {
        vec![BoxologyError::parse(
            "P001",
            format!("Failed to parse selection JSON: {}", e),
            None,
        )]
    })
}
