//! Schema inference and validation tests

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

fn key(k: &str) -> PathSegment {
    PathSegment::Key(k.to_string())
}

// ============================================================================
// Inference
// ============================================================================

#[test_case(json!("abc"), ScalarKind::String ; "string")]
#[test_case(json!(42), ScalarKind::Integer ; "integer")]
#[test_case(json!(-7), ScalarKind::Integer ; "negative integer")]
#[test_case(json!(2.0), ScalarKind::Integer ; "float without fraction")]
#[test_case(json!(1.5), ScalarKind::Number ; "number")]
#[test_case(json!(true), ScalarKind::Boolean ; "boolean")]
#[test_case(Value::Null, ScalarKind::Null ; "null")]
fn test_infer_scalar(value: Value, kind: ScalarKind) {
    assert_eq!(infer_schema(&value), SchemaNode::Scalar(kind));
}

#[test]
fn test_infer_simple_object() {
    let schema = infer_schema(&json!({
        "name": "John",
        "age": 30,
        "active": true
    }));

    assert_eq!(
        schema.to_document(),
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer"},
                "active": {"type": "boolean"}
            },
            "required": ["active", "age", "name"]
        })
    );
}

#[test]
fn test_infer_nested_object() {
    let schema = infer_schema(&json!({
        "user": {
            "name": "John",
            "email": "john@example.com"
        }
    }));

    let SchemaNode::Object { properties, .. } = &schema else {
        panic!("expected object schema, got {schema:?}");
    };
    let SchemaNode::Object {
        properties: user_props,
        required,
    } = &properties["user"]
    else {
        panic!("expected nested object");
    };
    assert!(user_props.contains_key("name"));
    assert!(user_props.contains_key("email"));
    assert!(required.contains("email"));
}

#[test]
fn test_infer_array_uses_first_element() {
    let schema = infer_schema(&json!([
        {"id": 1, "name": "Item 1"},
        {"id": "two", "tags": []}
    ]));

    assert_eq!(
        schema.to_document(),
        json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "id": {"type": "integer"},
                    "name": {"type": "string"}
                },
                "required": ["id", "name"]
            },
            "minItems": 0
        })
    );
}

#[test]
fn test_infer_empty_array() {
    let schema = infer_schema(&json!([]));

    let SchemaNode::Array { items, min_items } = &schema else {
        panic!("expected array schema, got {schema:?}");
    };
    assert_eq!(*min_items, 0);
    let SchemaNode::Union(alternatives) = items.as_ref() else {
        panic!("expected union items, got {items:?}");
    };
    let names: Vec<_> = alternatives.iter().map(SchemaNode::type_name).collect();
    assert_eq!(
        names,
        vec!["string", "integer", "number", "boolean", "object", "array", "null"]
    );
}

#[test]
fn test_infer_empty_array_document_uses_one_of() {
    let doc = infer_schema(&json!([])).to_document();
    assert_eq!(doc["type"], "array");
    assert_eq!(doc["minItems"], 0);
    assert!(doc["items"].get("type").is_none());
    assert_eq!(doc["items"]["oneOf"].as_array().unwrap().len(), 7);
}

#[test]
fn test_infer_empty_object() {
    assert_eq!(
        infer_schema(&json!({})).to_document(),
        json!({"type": "object", "properties": {}, "required": []})
    );
}

#[test]
fn test_strict_arrays() {
    let inferrer = SchemaInferrer::new().with_strict_arrays(true);

    let SchemaNode::Array { min_items, .. } = inferrer.infer(&json!([1, 2])) else {
        panic!("expected array schema");
    };
    assert_eq!(min_items, 1);

    // Empty samples stay permissive
    let SchemaNode::Array { min_items, .. } = inferrer.infer(&json!([])) else {
        panic!("expected array schema");
    };
    assert_eq!(min_items, 0);
}

#[test]
fn test_idempotent_serialization() {
    let value = json!({
        "data": [{"id": 1, "meta": {"score": 0.5, "tags": []}}],
        "next": null,
        "total": 12
    });

    let first = infer_schema(&value).to_json_pretty();
    let second = infer_schema(&value).to_json_pretty();
    assert_eq!(first, second);
}

#[test]
fn test_infer_does_not_mutate_input() {
    let value = json!({"items": [{"a": 1}], "b": "x"});
    let before = value.clone();
    let _ = infer_schema(&value);
    assert_eq!(value, before);
}

#[test]
fn test_nesting_depth() {
    assert_eq!(nesting_depth(&json!(1)), 0);
    assert_eq!(nesting_depth(&json!([])), 1);
    assert_eq!(nesting_depth(&json!({"a": [1, [2]]})), 3);
}

#[test]
fn test_max_depth_exceeded() {
    let inferrer = SchemaInferrer::new().with_max_depth(2);

    assert!(inferrer.try_infer(&json!({"a": [1]})).is_ok());

    let err = inferrer.try_infer(&json!({"a": [[1]]})).unwrap_err();
    assert!(matches!(err, Error::DepthExceeded { limit: 2 }));
}

#[test]
fn test_deep_value_without_ceiling() {
    let mut value = json!(1);
    for _ in 0..100 {
        value = json!([value]);
    }
    let schema = infer_schema(&value);
    assert_eq!(schema.node_count(), 101);
    assert!(validate(&value, &schema).is_ok());
}

// ============================================================================
// Validation
// ============================================================================

#[test_case(json!(null) ; "null")]
#[test_case(json!(true) ; "boolean")]
#[test_case(json!(3.25) ; "number")]
#[test_case(json!("text") ; "string")]
#[test_case(json!([]) ; "empty array")]
#[test_case(json!([[1, 2], [3]]) ; "nested arrays")]
#[test_case(json!({"a": {"b": [{"c": null}]}, "d": [1, 2]}) ; "nested object")]
fn test_round_trip(value: Value) {
    let schema = infer_schema(&value);
    assert_eq!(validate(&value, &schema), Ok(()));
}

#[test]
fn test_heterogeneous_array_follows_first_element() {
    let value = json!([1, "x"]);
    let schema = infer_schema(&value);

    let violations = validate(&value, &schema).unwrap_err();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, vec![PathSegment::Index(1)]);
}

#[test]
fn test_empty_array_schema_accepts_any_array() {
    let schema = infer_schema(&json!([]));

    assert!(validate(&json!([]), &schema).is_ok());
    assert!(validate(&json!([1, "x", {}]), &schema).is_ok());
    assert!(validate(&json!([null, true, 2.5, [1, {"k": "v"}]]), &schema).is_ok());
}

#[test_case(json!([[[1]]]) ; "three levels")]
#[test_case(json!([[[]]]) ; "nested empty")]
#[test_case(json!([[["a"]], [[[[{"k": [null]}]]]]]) ; "mixed depths")]
fn test_empty_array_schema_accepts_deep_nesting(value: Value) {
    let schema = infer_schema(&json!([]));
    assert_eq!(validate(&value, &schema), Ok(()));

    // Same behaviour after a trip through the stored document
    let decoded = SchemaNode::from_document(&schema.to_document()).unwrap();
    assert_eq!(validate(&value, &decoded), Ok(()));
}

#[test]
fn test_fallback_detection() {
    assert!(SchemaNode::any_item().is_any_item());
    let SchemaNode::Array { items, .. } = infer_schema(&json!([])) else {
        panic!("expected array schema");
    };
    assert!(items.is_any_item());
    assert!(!SchemaNode::Union(vec![SchemaNode::Scalar(ScalarKind::Null)]).is_any_item());
}

#[test]
fn test_empty_array_schema_rejects_non_array() {
    let schema = infer_schema(&json!([]));
    let violations = validate(&json!({"a": 1}), &schema).unwrap_err();
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].kind,
        ViolationKind::TypeMismatch {
            expected: "array".into(),
            found: "object".into()
        }
    );
}

#[test]
fn test_missing_required_field() {
    let schema = infer_schema(&json!({"id": 1, "name": "a"}));

    let violations = validate(&json!({"id": 1}), &schema).unwrap_err();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, Vec::<PathSegment>::new());
    assert_eq!(
        violations[0].kind,
        ViolationKind::MissingField {
            field: "name".into()
        }
    );
    assert_eq!(violations[0].message(), "missing required field name");
}

#[test]
fn test_unknown_keys_allowed() {
    let schema = infer_schema(&json!({"id": 1, "name": "a"}));
    assert!(validate(&json!({"id": 1, "name": "a", "extra": true}), &schema).is_ok());
}

#[test]
fn test_type_mismatch_path() {
    let schema = infer_schema(&json!({"id": 1}));

    let violations = validate(&json!({"id": "one"}), &schema).unwrap_err();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, vec![key("id")]);
    assert_eq!(violations[0].pointer(), "/id");
    assert_eq!(
        violations[0].to_string(),
        "/id: type mismatch: expected integer, found string"
    );
}

#[test]
fn test_numeric_widening() {
    let integer_schema = infer_schema(&json!({"id": 1}));
    let violations = validate(&json!({"id": 1.5}), &integer_schema).unwrap_err();
    assert_eq!(violations.len(), 1);

    let number_schema = infer_schema(&json!({"id": 1.5}));
    assert!(validate(&json!({"id": 1}), &number_schema).is_ok());
}

#[test]
fn test_array_element_accumulation() {
    let schema = infer_schema(&json!([{"id": 1}]));

    let violations = validate(&json!([{"id": 1}, {"id": "bad"}, {}]), &schema).unwrap_err();
    assert_eq!(violations.len(), 2);

    assert_eq!(violations[0].path, vec![PathSegment::Index(1), key("id")]);
    assert!(matches!(
        violations[0].kind,
        ViolationKind::TypeMismatch { .. }
    ));

    assert_eq!(violations[1].path, vec![PathSegment::Index(2)]);
    assert_eq!(
        violations[1].kind,
        ViolationKind::MissingField { field: "id".into() }
    );
}

#[test]
fn test_mismatch_stops_descent() {
    let schema = infer_schema(&json!({"user": {"id": 1, "name": "a"}}));

    // A string where an object is expected is one violation, not three
    let violations = validate(&json!({"user": "nobody"}), &schema).unwrap_err();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].pointer(), "/user");
}

#[test]
fn test_null_is_strict() {
    let schema = infer_schema(&json!({"deleted_at": null}));
    let violations = validate(&json!({"deleted_at": "2024-01-01"}), &schema).unwrap_err();
    assert_eq!(
        violations[0].kind,
        ViolationKind::TypeMismatch {
            expected: "null".into(),
            found: "string".into()
        }
    );
}

#[test]
fn test_too_few_items() {
    let schema = SchemaInferrer::new()
        .with_strict_arrays(true)
        .infer(&json!({"tags": ["a"]}));

    let violations = validate(&json!({"tags": []}), &schema).unwrap_err();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].pointer(), "/tags");
    assert_eq!(
        violations[0].kind,
        ViolationKind::TooFewItems { min: 1, found: 0 }
    );
}

#[test]
fn test_union_no_match_lists_alternatives() {
    let schema = SchemaNode::Union(vec![
        SchemaNode::Scalar(ScalarKind::String),
        SchemaNode::Scalar(ScalarKind::Null),
    ]);

    let violations = validate(&json!(5), &schema).unwrap_err();
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].message(),
        "value matches none of: string, null"
    );
}

#[test]
fn test_pointer_escaping() {
    let schema = infer_schema(&json!({"a/b": {"c~d": 1}}));
    let violations = validate(&json!({"a/b": {"c~d": "x"}}), &schema).unwrap_err();
    assert_eq!(violations[0].pointer(), "/a~1b/c~0d");
}

#[test]
fn test_report_serialization() {
    let schema = infer_schema(&json!({"id": 1}));
    let report = validate_report(&json!({"id": "x"}), &schema);

    assert!(!report.is_valid());
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({
            "violations": [{
                "pointer": "/id",
                "message": "type mismatch: expected integer, found string",
                "detail": {"kind": "type_mismatch", "expected": "integer", "found": "string"}
            }]
        })
    );
}

// ============================================================================
// Document codec
// ============================================================================

#[test]
fn test_document_decode_round_trip() {
    let schema = infer_schema(&json!({
        "data": [{"id": 1, "tags": [], "price": 9.99}],
        "meta": {"page": 1}
    }));

    let decoded = SchemaNode::from_document(&schema.to_document()).unwrap();
    assert_eq!(decoded, schema);

    let text = serde_json::to_string(&schema).unwrap();
    let parsed: SchemaNode = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, schema);
}

#[test]
fn test_document_ignores_unknown_keywords() {
    let doc = json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {}
    });
    let schema = SchemaNode::from_document(&doc).unwrap();
    assert_eq!(schema, SchemaNode::object(Default::default()));
}

#[test]
fn test_document_array_defaults_min_items() {
    let schema = SchemaNode::from_document(&json!({
        "type": "array",
        "items": {"type": "string"}
    }))
    .unwrap();
    assert_eq!(schema, SchemaNode::array(SchemaNode::Scalar(ScalarKind::String), 0));
}

#[test_case(json!({"properties": {}}), "" ; "missing type")]
#[test_case(json!({"type": "widget"}), "/type" ; "unknown type")]
#[test_case(json!({"type": 3}), "/type" ; "non string type")]
#[test_case(json!([]), "" ; "not an object")]
#[test_case(json!({"type": "array"}), "" ; "array without items")]
#[test_case(json!({"type": "array", "items": {"type": "string"}, "minItems": -1}), "/minItems" ; "negative min items")]
#[test_case(json!({"type": "object", "required": [1]}), "/required/0" ; "non string required")]
#[test_case(json!({"type": "object", "properties": []}), "/properties" ; "properties not object")]
#[test_case(json!({"type": "object", "properties": {"id": {}}}), "/properties/id" ; "nested missing type")]
#[test_case(json!({"oneOf": []}), "/oneOf" ; "empty one of")]
#[test_case(json!({"oneOf": [{"type": "string"}], "type": "string"}), "" ; "type and one of")]
fn test_malformed_document(doc: Value, expected_pointer: &str) {
    match SchemaNode::from_document(&doc) {
        Err(Error::MalformedSchema { pointer, .. }) => assert_eq!(pointer, expected_pointer),
        other => panic!("expected malformed schema error, got {other:?}"),
    }
}

#[test]
fn test_validate_document_fault_is_distinct() {
    let result = validate_document(&json!({"id": 1}), &json!({"properties": {}}));
    let err = result.unwrap_err();
    assert!(err.is_fault());
    assert!(matches!(err, Error::MalformedSchema { .. }));

    let report = validate_document(&json!({"id": "x"}), &json!({
        "type": "object",
        "properties": {"id": {"type": "integer"}},
        "required": ["id"]
    }))
    .unwrap();
    assert_eq!(report.len(), 1);
}

#[test]
fn test_unparsable_document() {
    let err = SchemaNode::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, Error::MalformedSchema { .. }));
}
