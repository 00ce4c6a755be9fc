//! Validation configuration: the type rules and pattern catalog, bundled as
//! immutable data that the validator and connection guard are built from.

pub mod catalog;
pub mod type_rules;

pub use catalog::{Pattern, PatternCatalog};
pub use type_rules::TypeRules;

use serde::{Deserialize, Serialize};

use crate::error::RuleSetError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleSet {
    pub type_rules: TypeRules,
    pub patterns: PatternCatalog,
}

impl RuleSet {
    pub fn canonical() -> Self {
        RuleSet {
            type_rules: TypeRules::canonical(),
            patterns: PatternCatalog::canonical(),
        }
    }

    /// Load an alternate rule set. Omitted sections fall back to canonical,
    /// e.g.
    /// `{"typeRules": {"Symbol": ["Train"]}, "patterns": [{"name": "p", "edges": [["Symbol", "Train"]]}]}`.
    pub fn from_json(json: &str) -> Result<Self, RuleSetError> {
        Ok(serde_json::from_str(json)?)
    }
}
