//! Canonical Boxology vocabulary.
//!
//! Node names arrive from the editor as free text ("Train", "training",
//! "deduce", ...). Everything downstream of ingestion works on the closed
//! [`BoxType`] enumeration and the [`NodeKind`] classification produced here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BoxType {
    Symbol,
    Data,
    Model,
    Actor,
    Train,
    Engineer,
    Transform,
    Deduce,
}

impl BoxType {
    pub const ALL: [BoxType; 8] = [
        BoxType::Symbol,
        BoxType::Data,
        BoxType::Model,
        BoxType::Actor,
        BoxType::Train,
        BoxType::Engineer,
        BoxType::Transform,
        BoxType::Deduce,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BoxType::Symbol => "Symbol",
            BoxType::Data => "Data",
            BoxType::Model => "Model",
            BoxType::Actor => "Actor",
            BoxType::Train => "Train",
            BoxType::Engineer => "Engineer",
            BoxType::Transform => "Transform",
            BoxType::Deduce => "Deduce",
        }
    }

    /// Normalize a free-text type name. Accepts any casing plus the wording
    /// variants used by older diagrams.
    pub fn parse(name: &str) -> Option<BoxType> {
        let normalized = name.trim().to_ascii_lowercase();
        let ty = match normalized.as_str() {
            "symbol" | "symbols" => BoxType::Symbol,
            "data" => BoxType::Data,
            "model" => BoxType::Model,
            "actor" => BoxType::Actor,
            "train" | "training" => BoxType::Train,
            "engineer" | "engineering" => BoxType::Engineer,
            "transform" | "transformation" => BoxType::Transform,
            "deduce" | "deduction" | "infer" | "inference" => BoxType::Deduce,
            _ => return None,
        };
        Some(ty)
    }

    /// Processes are subject to input/output cardinality rules.
    pub fn is_process(self) -> bool {
        matches!(
            self,
            BoxType::Train | BoxType::Engineer | BoxType::Transform | BoxType::Deduce
        )
    }

    /// Types that count as a produced artifact when a process points at them.
    pub fn is_output_target(self) -> bool {
        matches!(self, BoxType::Symbol | BoxType::Model | BoxType::Data)
    }
}

impl fmt::Display for BoxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown Boxology type '{0}'")]
pub struct UnknownBoxType(pub String);

impl FromStr for BoxType {
    type Err = UnknownBoxType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BoxType::parse(s).ok_or_else(|| UnknownBoxType(s.to_string()))
    }
}

impl TryFrom<String> for BoxType {
    type Error = UnknownBoxType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BoxType> for String {
    fn from(ty: BoxType) -> Self {
        ty.as_str().to_string()
    }
}

/// Free-text annotation categories. Nodes named or labelled like this are
/// decoration and never take part in validation.
const ANNOTATIONS: &[&str] = &[
    "comment",
    "comments",
    "note",
    "notes",
    "description",
    "conditions",
    "precondition",
    "postcondition",
];

pub fn is_annotation(text: &str) -> bool {
    let normalized: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect();
    ANNOTATIONS.contains(&normalized.as_str())
}

/// Structural role of a physical node, decided once at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "type", rename_all = "camelCase")]
pub enum NodeKind {
    Box(BoxType),
    Annotation,
    Group,
    Unrecognized,
}

impl NodeKind {
    pub fn classify(name: &str, label: &str, is_group: bool) -> NodeKind {
        if is_group {
            return NodeKind::Group;
        }
        if is_annotation(name) || is_annotation(label) {
            return NodeKind::Annotation;
        }
        match BoxType::parse(name) {
            Some(ty) => NodeKind::Box(ty),
            None => NodeKind::Unrecognized,
        }
    }

    pub fn box_type(self) -> Option<BoxType> {
        match self {
            NodeKind::Box(ty) => Some(ty),
            _ => None,
        }
    }

    /// Whether the node takes part in validation at all.
    pub fn is_semantic(self) -> bool {
        matches!(self, NodeKind::Box(_) | NodeKind::Unrecognized)
    }

    pub fn is_process(self) -> bool {
        self.box_type().is_some_and(BoxType::is_process)
    }

    pub fn is_output_target(self) -> bool {
        self.box_type().is_some_and(BoxType::is_output_target)
    }
}
