//! Connection guard: rule enforcement, duplicate merging, cardinality.

#[allow(dead_code)]
mod helpers;

use boxology::error::{BoxologyError, Phase, Rejection};
use boxology::guard::{self, Connection, ConnectionGuard};
use boxology::rules::TypeRules;
use boxology::vocab::BoxType::*;
use helpers::*;

#[test]
fn legal_edge_is_inserted() {
    let mut diagram = diagram(vec![node("s", "Symbol", ""), node("t", "Train", "")], &[]);

    let outcome = guard::connect(&mut diagram, "s", "t").unwrap();

    assert_eq!(
        outcome,
        Connection::Connected {
            from: "s".into(),
            to: "t".into()
        }
    );
    assert!(diagram.contains_edge("s", "t"));
}

#[test]
fn actor_to_data_is_rejected_and_diagram_untouched() {
    let mut diagram = diagram(
        vec![node("a", "Actor", "Dev"), node("d", "Data", "Logs")],
        &[],
    );
    let before = diagram.to_model();

    let err = guard::connect(&mut diagram, "a", "d").unwrap_err();

    assert_eq!(err.code(), "G002");
    assert_eq!(err.to_string(), "Connection from Actor to Data is not allowed");
    assert_eq!(diagram.to_model(), before);
    assert_eq!(diagram.edge_count(), 0);
}

#[test]
fn rejection_converts_to_guard_error() {
    let mut diagram = diagram(vec![node("a", "Actor", ""), node("d", "Data", "")], &[]);
    let err: BoxologyError = guard::connect(&mut diagram, "a", "d").unwrap_err().into();

    assert_eq!(err.code, "G002");
    assert_eq!(err.phase, Phase::Guard);
    assert_eq!(err.node_key.as_deref(), Some("a"));
}

#[test]
fn reverse_direction_is_rejected() {
    let mut diagram = diagram(vec![node("t", "Train", ""), node("s", "Symbol", "")], &[]);
    assert!(guard::connect(&mut diagram, "t", "s").is_ok());

    let mut diagram = diagram_pair("Model", "Train");
    let err = guard::connect(&mut diagram, "a", "b").unwrap_err();
    assert!(matches!(err, Rejection::IllegalConnection { .. }));
}

#[test]
fn unknown_endpoint_is_g001() {
    let mut diagram = diagram(vec![node("s", "Symbol", "")], &[]);
    let err = guard::connect(&mut diagram, "s", "nowhere").unwrap_err();
    assert_eq!(err, Rejection::UnknownNode("nowhere".into()));
    assert_eq!(err.code(), "G001");
}

#[test]
fn unrecognized_types_cannot_connect() {
    let mut diagram = diagram(vec![node("w", "Widget", ""), node("t", "Train", "")], &[]);
    let err = guard::connect(&mut diagram, "w", "t").unwrap_err();
    assert_eq!(
        err,
        Rejection::IllegalConnection {
            from: "w".into(),
            to: "t".into(),
            from_type: "Widget".into(),
            to_type: "Train".into(),
        }
    );
}

#[test]
fn second_output_from_a_process_is_g003() {
    let mut diagram = diagram(
        vec![
            node("t", "Train", "Fit"),
            node("m", "Model", ""),
            node("s", "Symbol", ""),
        ],
        &[("t", "m")],
    );
    let before = diagram.to_model();

    let err = guard::connect(&mut diagram, "t", "s").unwrap_err();

    assert_eq!(err.code(), "G003");
    assert!(err.to_string().starts_with("Train 'Fit'"));
    assert_eq!(diagram.to_model(), before);
}

#[test]
fn redrawing_the_existing_output_is_not_a_second_output() {
    let mut diagram = diagram(
        vec![node("t", "Train", ""), node("m", "Model", "")],
        &[("t", "m")],
    );

    let outcome = guard::connect(&mut diagram, "t", "m").unwrap();

    assert_eq!(
        outcome,
        Connection::Existing {
            from: "t".into(),
            to: "m".into()
        }
    );
    assert_eq!(diagram.edge_count(), 1);
}

#[test]
fn duplicate_nodes_merge_without_an_edge() {
    let mut diagram = diagram(
        vec![node("s1", "Symbol", "KB"), node("s2", "Symbol", "KB")],
        &[],
    );

    let outcome = guard::connect(&mut diagram, "s1", "s2").unwrap();

    assert_eq!(
        outcome,
        Connection::Merged {
            survivor: "s1".into(),
            removed: "s2".into(),
            repointed_edges: 0,
        }
    );
    assert_eq!(diagram.node_count(), 1);
    assert_eq!(diagram.edge_count(), 0);
    assert!(diagram.node("s2").is_none());
}

#[test]
fn merge_drops_edges_between_the_pair() {
    let mut diagram = diagram(
        vec![node("s1", "Symbol", "KB"), node("s2", "Symbol", "KB")],
        &[("s1", "s2"), ("s2", "s1")],
    );

    guard::connect(&mut diagram, "s1", "s2").unwrap();

    assert_eq!(diagram.node_count(), 1);
    assert_eq!(diagram.edge_count(), 0);
}

#[test]
fn merge_repoints_the_removed_nodes_edges() {
    let mut diagram = diagram(
        vec![
            node("s1", "Symbol", "KB"),
            node("s2", "Symbol", "KB"),
            node("x", "Deduce", ""),
            node("t", "Train", ""),
            node("m", "Model", ""),
        ],
        &[("x", "s2"), ("s2", "t"), ("t", "m")],
    );

    let outcome = guard::connect(&mut diagram, "s1", "s2").unwrap();

    assert!(matches!(
        outcome,
        Connection::Merged {
            repointed_edges: 2,
            ..
        }
    ));
    assert_eq!(diagram.node_count(), 4);
    assert_eq!(diagram.edge_count(), 3);
    assert!(diagram.contains_edge("x", "s1"));
    assert!(diagram.contains_edge("s1", "t"));
    let model = diagram.to_model();
    assert!(model.edges.iter().all(|e| e.from != "s2" && e.to != "s2"));
}

#[test]
fn merge_does_not_duplicate_shared_edges() {
    let mut diagram = diagram(
        vec![
            node("s1", "Symbol", "KB"),
            node("s2", "Symbol", "KB"),
            node("t", "Train", ""),
        ],
        &[("s1", "t"), ("s2", "t")],
    );

    let outcome = guard::connect(&mut diagram, "s1", "s2").unwrap();

    assert!(matches!(
        outcome,
        Connection::Merged {
            repointed_edges: 0,
            ..
        }
    ));
    assert_eq!(diagram.edge_count(), 1);
}

#[test]
fn merge_ignores_casing_and_padding() {
    let mut diagram = diagram(
        vec![node("a", "symbol", "KB"), node("b", "Symbols", " KB ")],
        &[],
    );

    let outcome = guard::connect(&mut diagram, "a", "b").unwrap();
    assert!(matches!(outcome, Connection::Merged { .. }));
}

#[test]
fn same_type_with_different_label_is_rejected() {
    let mut diagram = diagram(
        vec![node("a", "Symbol", "KB"), node("b", "Symbol", "Rules")],
        &[],
    );

    let err = guard::connect(&mut diagram, "a", "b").unwrap_err();

    assert_eq!(err.to_string(), "Connection from Symbol to Symbol is not allowed");
    assert_eq!(diagram.node_count(), 2);
}

#[test]
fn check_never_mutates() {
    let diagram = diagram(
        vec![node("s1", "Symbol", "KB"), node("s2", "Symbol", "KB")],
        &[],
    );
    let guard = ConnectionGuard::default();

    assert!(guard.check(&diagram, "s1", "s2").is_ok());
    assert_eq!(diagram.node_count(), 2);
}

#[test]
fn custom_rules_replace_the_canonical_table() {
    let guard = ConnectionGuard::new(TypeRules::from_pairs([(Actor, Data)]));
    let mut diagram = diagram(
        vec![
            node("a", "Actor", ""),
            node("d", "Data", ""),
            node("e", "Engineer", ""),
        ],
        &[],
    );

    assert!(guard.connect(&mut diagram, "a", "d").is_ok());
    assert!(guard.connect(&mut diagram, "a", "e").is_err());
    assert!(guard.rules().permits(Actor, Data));
}

fn diagram_pair(from: &str, to: &str) -> boxology::model::Diagram {
    diagram(vec![node("a", from, ""), node("b", to, "")], &[])
}

#[test]
fn merging_processes_with_different_outputs_is_g003() {
    let mut diagram = diagram(
        vec![
            node("t1", "Train", "Fit"),
            node("t2", "Train", "Fit"),
            node("m", "Model", ""),
            node("s", "Symbol", ""),
        ],
        &[("t1", "m"), ("t2", "s")],
    );
    let before = diagram.to_model();

    let err = guard::connect(&mut diagram, "t1", "t2").unwrap_err();

    assert_eq!(err.code(), "G003");
    assert_eq!(diagram.to_model(), before);
    assert_eq!(diagram.node_count(), 4);
}

#[test]
fn merging_processes_with_a_shared_output_is_allowed() {
    let mut diagram = diagram(
        vec![
            node("t1", "Train", "Fit"),
            node("t2", "Train", "Fit"),
            node("m", "Model", ""),
        ],
        &[("t1", "m"), ("t2", "m")],
    );

    let outcome = guard::connect(&mut diagram, "t1", "t2").unwrap();

    assert!(matches!(outcome, Connection::Merged { .. }));
    assert_eq!(diagram.successors("t1").len(), 1);
}
