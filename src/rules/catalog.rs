//! Pattern Catalog: the closed list of elementary Boxology idioms.
//!
//! Catalog order is matching priority. The matcher commits edges greedily,
//! pattern by pattern, so the larger idioms of each family come first.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::RuleSetError;
use crate::vocab::BoxType;

use crate::vocab::BoxType::{Actor, Data, Deduce, Engineer, Model, Symbol, Train, Transform};

const CANONICAL: &[(&str, &[(BoxType, BoxType)])] = &[
    (
        "train_model (symbol+data)",
        &[(Symbol, Train), (Data, Train), (Train, Model)],
    ),
    ("train_model (symbol)", &[(Symbol, Train), (Train, Model)]),
    ("train_model (data)", &[(Data, Train), (Train, Model)]),
    ("engineer_model", &[(Actor, Engineer), (Engineer, Model)]),
    ("engineer_symbol", &[(Actor, Engineer), (Engineer, Symbol)]),
    (
        "deduce_symbol (symbol)",
        &[(Model, Deduce), (Symbol, Deduce), (Deduce, Symbol)],
    ),
    (
        "deduce_symbol (data)",
        &[(Model, Deduce), (Data, Deduce), (Deduce, Symbol)],
    ),
    (
        "deduce_data",
        &[(Model, Deduce), (Data, Deduce), (Deduce, Data)],
    ),
    (
        "embed_model",
        &[(Symbol, Transform), (Data, Transform), (Transform, Model)],
    ),
    (
        "transform_symbol_to_data",
        &[(Symbol, Transform), (Transform, Data)],
    ),
    (
        "transform_data_to_symbol",
        &[(Data, Transform), (Transform, Symbol)],
    ),
    ("transform_data", &[(Data, Transform), (Transform, Data)]),
    ("transform_symbol", &[(Symbol, Transform), (Transform, Symbol)]),
];

/// A named set of required typed edges. Edges are matched by type only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    pub edges: Vec<(BoxType, BoxType)>,
}

impl Pattern {
    pub fn new(name: impl Into<String>, edges: Vec<(BoxType, BoxType)>) -> Self {
        Pattern {
            name: name.into(),
            edges,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Pattern>", into = "Vec<Pattern>")]
pub struct PatternCatalog {
    patterns: Vec<Pattern>,
}

impl PatternCatalog {
    pub fn new(patterns: Vec<Pattern>) -> Result<Self, RuleSetError> {
        let mut names = HashSet::new();
        for pattern in &patterns {
            if pattern.edges.is_empty() {
                return Err(RuleSetError::EmptyPattern(pattern.name.clone()));
            }
            if !names.insert(pattern.name.as_str()) {
                return Err(RuleSetError::DuplicatePattern(pattern.name.clone()));
            }
        }
        Ok(PatternCatalog { patterns })
    }

    pub fn canonical() -> Self {
        PatternCatalog {
            patterns: CANONICAL
                .iter()
                .map(|(name, edges)| Pattern::new(*name, edges.to_vec()))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::canonical()
    }
}

impl TryFrom<Vec<Pattern>> for PatternCatalog {
    type Error = RuleSetError;

    fn try_from(patterns: Vec<Pattern>) -> Result<Self, Self::Error> {
        PatternCatalog::new(patterns)
    }
}

impl From<PatternCatalog> for Vec<Pattern> {
    fn from(catalog: PatternCatalog) -> Self {
        catalog.patterns
    }
}
