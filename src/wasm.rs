//! WASM entry points for the diagram editor.

use wasm_bindgen::prelude::*;

use crate::error::BoxologyError;
use crate::guard::{Connection, ConnectionGuard};
use crate::model::DiagramModel;
use crate::rules::RuleSet;
use crate::validate::{ValidationReport, Validator};

/// Validate a whole diagram JSON. `rules_json` optionally replaces the
/// canonical rule set. Returns a `ValidationResult` object.
#[wasm_bindgen]
pub fn validate_diagram(json: &str, rules_json: Option<String>) -> JsValue {
    let result = validate_diagram_inner(json, rules_json.as_deref());
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Validate the selected part of a diagram. `selection_json` is
/// `{"nodes": [key...], "edges": [{"from", "to"}...]}`.
#[wasm_bindgen]
pub fn validate_selection(json: &str, selection_json: &str, rules_json: Option<String>) -> JsValue {
    let result = validate_selection_inner(json, selection_json, rules_json.as_deref());
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Run the connection guard on a freshly drawn edge. On acceptance the
/// updated diagram is returned; on rejection the caller keeps its own copy.
#[wasm_bindgen]
pub fn connect_nodes(json: &str, from: &str, to: &str, rules_json: Option<String>) -> JsValue {
    let result = connect_nodes_inner(json, from, to, rules_json.as_deref());
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn load_rules(rules_json: Option<&str>) -> Result<RuleSet, Vec<ErrorDto>> {
    match rules_json {
        Some(json) => RuleSet::from_json(json)
            .map_err(|e| vec![ErrorDto::from(BoxologyError::from(e))]),
        None => Ok(RuleSet::canonical()),
    }
}

fn errors(errors: Vec<BoxologyError>) -> Vec<ErrorDto> {
    errors.into_iter().map(ErrorDto::from).collect()
}

fn validate_diagram_inner(json: &str, rules_json: Option<&str>) -> ValidationResult {
    let rules = match load_rules(rules_json) {
        Ok(r) => r,
        Err(e) => return ValidationResult::Errors(e),
    };
    let diagram = match crate::model::parse_and_build(json) {
        Ok(d) => d,
        Err(e) => return ValidationResult::Errors(errors(e)),
    };

    match Validator::new(rules).validate_whole(&diagram) {
        Ok(report) => ValidationResult::from(report),
        Err(e) => ValidationResult::Errors(vec![ErrorDto::from(BoxologyError::from(e))]),
    }
}

fn validate_selection_inner(
    json: &str,
    selection_json: &str,
    rules_json: Option<&str>,
) -> ValidationResult {
    let rules = match load_rules(rules_json) {
        Ok(r) => r,
        Err(e) => return ValidationResult::Errors(e),
    };
    let diagram = match crate::model::parse_and_build(json) {
        Ok(d) => d,
        Err(e) => return ValidationResult::Errors(errors(e)),
    };
    let selection = match crate::model::parse_selection(selection_json) {
        Ok(s) => s,
        Err(e) => return ValidationResult::Errors(errors(e)),
    };

    match Validator::new(rules).validate_selection(&diagram, &selection) {
        Ok(report) => ValidationResult::from(report),
        Err(e) => ValidationResult::Errors(vec![ErrorDto::from(BoxologyError::from(e))]),
    }
}

fn connect_nodes_inner(json: &str, from: &str, to: &str, rules_json: Option<&str>) -> ConnectResult {
    let rules = match load_rules(rules_json) {
        Ok(r) => r,
        Err(e) => return ConnectResult::Errors(e),
    };
    let mut diagram = match crate::model::parse_and_build(json) {
        Ok(d) => d,
        Err(e) => return ConnectResult::Errors(errors(e)),
    };

    match ConnectionGuard::new(rules.type_rules).connect(&mut diagram, from, to) {
        Ok(connection) => ConnectResult::Accepted {
            connection,
            diagram: diagram.to_model(),
        },
        Err(rejection) => ConnectResult::Rejected(ErrorDto::from(BoxologyError::from(rejection))),
    }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize)]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
    node_key: Option<String>,
}

impl From<BoxologyError> for ErrorDto {
    fn from(e: BoxologyError) -> Self {
        ErrorDto {
            code: e.code,
            phase: e.phase.to_string(),
            message: e.message,
            node_key: e.node_key,
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(tag = "status")]
enum ValidationResult {
    #[serde(rename = "report")]
    Report {
        report: ValidationReport,
        text: String,
    },
    #[serde(rename = "errors")]
    Errors(Vec<ErrorDto>),
}

impl From<ValidationReport> for ValidationResult {
    fn from(report: ValidationReport) -> Self {
        let text = report.render();
        ValidationResult::Report { report, text }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(tag = "status")]
enum ConnectResult {
    #[serde(rename = "accepted")]
    Accepted {
        connection: Connection,
        diagram: DiagramModel,
    },
    #[serde(rename = "rejected")]
    Rejected(ErrorDto),
    #[serde(rename = "errors")]
    Errors(Vec<ErrorDto>),
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRAINING: &str = r#"{
        "nodes": [
            {"key": -1, "name": "Symbol", "label": "KB"},
            {"key": -2, "name": "train", "label": ""},
            {"key": -3, "name": "Model", "label": "ML"}
        ],
        "edges": [{"from": -1, "to": -2}, {"from": -2, "to": -3}]
    }"#;

    #[test]
    fn diagram_report_carries_text() {
        match validate_diagram_inner(TRAINING, None) {
            ValidationResult::Report { report, text } => {
                assert!(report.is_valid());
                assert!(text.starts_with("Diagram is VALID"), "{}", text);
            }
            ValidationResult::Errors(e) => panic!("unexpected errors: {:?}", e),
        }
    }

    #[test]
    fn malformed_json_is_p001() {
        match validate_diagram_inner("{nope", None) {
            ValidationResult::Errors(e) => assert_eq!(e[0].code, "P001"),
            other => panic!("expected errors, got {:?}", other),
        }
    }

    #[test]
    fn bad_rules_json_is_r001() {
        match validate_diagram_inner(TRAINING, Some("not json")) {
            ValidationResult::Errors(e) => assert_eq!(e[0].code, "R001"),
            other => panic!("expected errors, got {:?}", other),
        }
    }

    #[test]
    fn empty_selection_is_v001() {
        match validate_selection_inner(TRAINING, r#"{"nodes": [], "edges": []}"#, None) {
            ValidationResult::Errors(e) => assert_eq!(e[0].code, "V001"),
            other => panic!("expected errors, got {:?}", other),
        }
    }

    #[test]
    fn rejected_connection_reports_guard_code() {
        let json = r#"{
            "nodes": [
                {"key": "a", "name": "Actor", "label": "Dev"},
                {"key": "d", "name": "Data", "label": "Logs"}
            ],
            "edges": []
        }"#;
        match connect_nodes_inner(json, "a", "d", None) {
            ConnectResult::Rejected(e) => {
                assert_eq!(e.code, "G002");
                assert_eq!(e.phase, "Guard");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn accepted_connection_returns_updated_diagram() {
        let json = r#"{
            "nodes": [
                {"key": "s", "name": "Symbol", "label": "KB"},
                {"key": "t", "name": "Train", "label": ""}
            ],
            "edges": []
        }"#;
        match connect_nodes_inner(json, "s", "t", None) {
            ConnectResult::Accepted { connection, diagram } => {
                assert!(matches!(connection, Connection::Connected { .. }));
                assert_eq!(diagram.edges.len(), 1);
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
    }
}
