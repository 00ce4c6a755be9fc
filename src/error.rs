//! Error taxonomy shared by ingestion, rule loading, validation and the
//! connection guard.
//!
//! Each concern has its own `thiserror` enum; [`BoxologyError`] is the flat,
//! coded form handed across the WASM boundary.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Parse,
    Rules,
    Validate,
    Guard,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Parse => write!(f, "Parse"),
            Phase::Rules => write!(f, "Rules"),
            Phase::Validate => write!(f, "Validate"),
            Phase::Guard => write!(f, "Guard"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoxologyError {
    pub code: String,
    pub phase: Phase,
    pub message: String,
    pub node_key: Option<String>,
}

impl std::fmt::Display for BoxologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.node_key {
            Some(key) => write!(
                f,
                "[{}:{}] {} (node '{}')",
                self.phase, self.code, self.message, key
            ),
            None => write!(f, "[{}:{}] {}", self.phase, self.code, self.message),
        }
    }
}

impl std::error::Error for BoxologyError {}

impl BoxologyError {
    pub fn parse(code: &str, message: impl Into<String>, node_key: Option<String>) -> Self {
        BoxologyError {
            code: code.into(),
            phase: Phase::Parse,
            message: message.into(),
            node_key,
        }
    }
}

/// Problems loading an alternate rule set.
#[derive(Debug, Error)]
pub enum RuleSetError {
    #[error("failed to parse rule set JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pattern '{0}' has no edges")]
    EmptyPattern(String),

    #[error("pattern '{0}' is defined more than once")]
    DuplicatePattern(String),
}

impl RuleSetError {
    pub fn code(&self) -> &'static str {
        match self {
            RuleSetError::Json(_) => "R001",
            RuleSetError::EmptyPattern(_) => "R002",
            RuleSetError::DuplicatePattern(_) => "R003",
        }
    }
}

impl From<RuleSetError> for BoxologyError {
    fn from(e: RuleSetError) -> Self {
        BoxologyError {
            code: e.code().into(),
            phase: Phase::Rules,
            message: e.to_string(),
            node_key: None,
        }
    }
}

/// Reasons a validation run cannot produce a report. These are guidance for
/// the user, not a broken diagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidateError {
    #[error("Nothing selected: select the nodes and connections to validate")]
    EmptySelection,

    #[error("The diagram contains no Boxology nodes to validate")]
    EmptyDiagram,

    #[error("Selected node '{0}' does not exist in the diagram")]
    UnknownNode(String),

    #[error("Selected connection '{from}' -> '{to}' does not exist in the diagram")]
    UnknownEdge { from: String, to: String },
}

impl ValidateError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidateError::EmptySelection => "V001",
            ValidateError::EmptyDiagram => "V002",
            ValidateError::UnknownNode(_) => "V003",
            ValidateError::UnknownEdge { .. } => "V004",
        }
    }
}

impl From<ValidateError> for BoxologyError {
    fn from(e: ValidateError) -> Self {
        let node_key = match &e {
            ValidateError::UnknownNode(key) => Some(key.clone()),
            ValidateError::UnknownEdge { from, .. } => Some(from.clone()),
            _ => None,
        };
        BoxologyError {
            code: e.code().into(),
            phase: Phase::Validate,
            message: e.to_string(),
            node_key,
        }
    }
}

/// Why the connection guard refused a newly drawn edge. The diagram is left
/// exactly as it was before the edge was drawn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Node '{0}' does not exist in the diagram")]
    UnknownNode(String),

    #[error("Connection from {from_type} to {to_type} is not allowed")]
    IllegalConnection {
        from: String,
        to: String,
        from_type: String,
        to_type: String,
    },

    #[error("{process_type} '{label}' already has an output; a process may produce exactly one")]
    TooManyOutputs {
        process: String,
        process_type: String,
        label: String,
    },
}

impl Rejection {
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::UnknownNode(_) => "G001",
            Rejection::IllegalConnection { .. } => "G002",
            Rejection::TooManyOutputs { .. } => "G003",
        }
    }
}

impl From<Rejection> for BoxologyError {
    fn from(e: Rejection) -> Self {
        let node_key = match &e {
            Rejection::UnknownNode(key) => Some(key.clone()),
            Rejection::IllegalConnection { from, .. } => Some(from.clone()),
            Rejection::TooManyOutputs { process, .. } => Some(process.clone()),
        };
        BoxologyError {
            code: e.code().into(),
            phase: Phase::Guard,
            message: e.to_string(),
            node_key,
        }
    }
}
