//! Integration tests for parsing, type checking and serialization.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use style_expression::{parse_expression, ExprKind, Expression, ParseOptions, Type};

fn parse_ok(raw: Value, expected: Option<Type>) -> Expression {
    let options = ParseOptions {
        expected,
        key: None,
    };
    parse_expression(&raw, &options)
        .unwrap_or_else(|e| panic!("parse({}) failed: {:?}", raw, e))
}

fn parse_errors(raw: Value, expected: Option<Type>) -> Vec<(String, String)> {
    let options = ParseOptions {
        expected,
        key: None,
    };
    parse_expression(&raw, &options)
        .err()
        .unwrap_or_else(|| panic!("expected errors for {}", raw))
        .into_iter()
        .map(|e| (e.path, e.message))
        .collect()
}

fn round_trip(raw: Value) {
    let first = parse_ok(raw.clone(), None);
    let serialized = first.serialize();
    assert_eq!(serialized, raw);
    let second = parse_ok(serialized, None);
    assert_eq!(second, first);
}

// ----------------------------------------------------------------- Round trip

#[test]
fn test_round_trip() {
    round_trip(json!(["coalesce", ["get", "a"], ["get", "b"], 0]));
    round_trip(json!(["let", "x", 1, "y", ["var", "x"], ["var", "y"]]));
    round_trip(json!(["curve", ["exponential", 1.5], ["zoom"], 0, 1, 10, 2.5]));
    round_trip(json!(["curve", ["step"], ["number", ["get", "n"]], 0, "a", 5, "b"]));
    round_trip(json!(["match", ["string", ["get", "k"]], ["a", "b"], 1, "c", 2, 0]));
    round_trip(json!(["case", ["has", "a"], ["get", "a"], ["!", true], 1, 2]));
    round_trip(json!(["array", "number", 2, ["literal", [1, 2]]]));
    round_trip(json!(["parse-color", ["string", ["get", "c"], "red"]]));
    round_trip(json!(["coalesce", ["get", "missing"], ["error", "nothing there"]]));
    round_trip(json!(["literal", {"a": [1, 2]}]));
}

#[test]
fn test_serialize_keeps_integers() {
    let expr = parse_ok(json!(["curve", ["linear"], ["zoom"], 0, 0, 22, 10]), None);
    assert_eq!(
        expr.serialize(),
        json!(["curve", ["linear"], ["zoom"], 0, 0, 22, 10])
    );
}

// ------------------------------------------------------------------- Coalesce

#[test]
fn test_coalesce_types() {
    let expr = parse_ok(json!(["coalesce", ["get", "a"], 1]), None);
    assert_eq!(expr.ty, Type::Number);
    let expr = parse_ok(json!(["coalesce", ["get", "a"], ["get", "b"]]), None);
    assert_eq!(expr.ty, Type::Unknown);
    let expr = parse_ok(json!(["coalesce", "a", "b"]), Some(Type::enumeration(["a", "b"])));
    assert_eq!(expr.ty, Type::String);
}

#[test]
fn test_coalesce_unification_failure() {
    let errors = parse_errors(json!(["coalesce", 1, "a"]), None);
    assert_eq!(
        errors,
        vec![(
            "[2]".to_string(),
            "Expected number but found string instead.".to_string()
        )]
    );
}

#[test]
fn test_coalesce_arity() {
    let errors = parse_errors(json!(["coalesce"]), None);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].1.contains("at least 1 argument"), "got: {:?}", errors);
}

#[test]
fn test_errors_are_batched() {
    let errors = parse_errors(json!(["coalesce", ["get", 1], ["nope"], ["var", "x"]]), None);
    let paths: Vec<&str> = errors.iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(paths, vec!["[1][1]", "[2][0]", "[3][1]"]);
    assert!(errors[1].1.contains("Unknown expression \"nope\""));
}

#[test]
fn test_error_paths_start_at_key() {
    let options = ParseOptions {
        expected: Some(Type::Number),
        key: Some("line-width".to_string()),
    };
    let errors = parse_expression(&json!(["coalesce", "wide"]), &options).unwrap_err();
    assert_eq!(errors[0].to_string(), "line-width[1]: Expected number but found string instead.");
}

// ------------------------------------------------------------------------ Let

#[test]
fn test_let_type_is_body_type() {
    let expr = parse_ok(json!(["let", "a", "text", ["var", "a"]]), None);
    assert_eq!(expr.ty, Type::String);
}

#[test]
fn test_let_arity_and_names() {
    let errors = parse_errors(json!(["let", "a", 1, "b", ["var", "a"]]), None);
    assert!(errors[0].1.contains("odd number"), "got: {:?}", errors);

    let errors = parse_errors(json!(["let", "not-valid", 1, 2]), None);
    assert_eq!(errors[0].0, "[1]");
    assert!(errors[0].1.contains("alphanumeric"));

    let errors = parse_errors(json!(["let", 3, 1, 2]), None);
    assert_eq!(errors[0].0, "[1]");
}

#[test]
fn test_let_errors_are_batched() {
    let errors = parse_errors(json!(["let", "x", ["bogus"], "y", ["bogus2"], ["var", "x"]]), None);
    let paths: Vec<&str> = errors.iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(paths, vec!["[2][0]", "[4][0]"]);

    let errors = parse_errors(json!(["let", "a-b", 1, "c", ["nope"], ["get", 5]]), None);
    let paths: Vec<&str> = errors.iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(paths, vec!["[1]", "[4][0]", "[5][1]"]);
}

#[test]
fn test_let_scope_does_not_leak() {
    let errors = parse_errors(
        json!(["coalesce", ["let", "x", 1, ["var", "x"]], ["var", "x"]]),
        None,
    );
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, "[2][1]");
}

#[test]
fn test_let_value_ignores_outer_expectation() {
    let expr = parse_ok(json!(["let", "s", "text", 5]), Some(Type::Number));
    assert_eq!(expr.ty, Type::Number);
}

#[test]
fn test_let_children_in_declaration_order() {
    let expr = parse_ok(json!(["let", "a", 1, "b", 2, ["var", "b"]]), None);
    let mut kinds = Vec::new();
    expr.walk(&mut |e| kinds.push(e.serialize()));
    assert_eq!(
        kinds,
        vec![
            json!(["let", "a", 1, "b", 2, ["var", "b"]]),
            json!(1),
            json!(2),
            json!(["var", "b"]),
        ]
    );
}

// ---------------------------------------------------------------- Other nodes

#[test]
fn test_bare_objects_and_empty_arrays() {
    let errors = parse_errors(json!({"a": 1}), None);
    assert!(errors[0].1.contains("Bare objects invalid"));
    let errors = parse_errors(json!([]), None);
    assert!(errors[0].1.contains("at least one element"));
}

#[test]
fn test_literal_arrays_take_expected_type() {
    let expected = Type::array(Type::Number, Some(2));
    let expr = parse_ok(json!(["literal", [1, 2]]), Some(expected.clone()));
    assert_eq!(expr.ty, expected);
    assert!(matches!(expr.kind, ExprKind::Literal(_)));
}

#[test]
fn test_curve_validation() {
    let errors = parse_errors(json!(["curve", ["linear"], ["zoom"], 5, 1, 0, 2]), None);
    assert!(errors[0].1.contains("strictly ascending"));

    let errors = parse_errors(json!(["curve", ["linear"], ["zoom"], 0, "a", 5, "b"]), None);
    assert!(errors[0].1.contains("not interpolatable"));

    let errors = parse_errors(json!(["curve", ["cubic"], ["zoom"], 0, 1]), None);
    assert_eq!(errors[0].0, "[1]");

    let errors = parse_errors(json!(["curve", ["step"], "z", 0, 1]), None);
    assert_eq!(errors[0].0, "[2]");

    for base in [json!(-2), json!(0)] {
        let errors = parse_errors(json!(["curve", ["exponential", base], ["zoom"], 0, 0, 10, 10]), None);
        assert_eq!(errors[0].0, "[1]");
        assert!(errors[0].1.contains("positive base"), "got: {:?}", errors);
    }
}

#[test]
fn test_match_labels() {
    let errors = parse_errors(json!(["match", ["get", "k"], "a", 1, "a", 2, 0]), None);
    assert!(errors[0].1.contains("unique"));

    let errors = parse_errors(json!(["match", ["get", "k"], "a", 1, 2, 2, 0]), None);
    assert!(errors[0].1.contains("Expected string but found number"));

    let expr = parse_ok(json!(["match", ["get", "k"], [1, 2], "low", "high"]), None);
    assert_eq!(expr.ty, Type::String);
}

#[test]
fn test_static_analysis() {
    let expr = parse_ok(json!(["curve", ["linear"], ["zoom"], 0, 0, 10, ["get", "w"]]), None);
    assert!(!expr.is_zoom_constant());
    assert!(!expr.is_feature_constant());

    let expr = parse_ok(json!(["has", "k", ["literal", {"k": 1}]]), None);
    assert!(expr.is_zoom_constant());
    assert!(expr.is_feature_constant());
}
