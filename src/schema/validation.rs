//! Structural validation of JSON values against a schema
//!
//! Violations are collected, not raised: a value either conforms or the
//! caller gets every mismatch found, each tagged with the path where it
//! occurred. A broken schema *document* is a different failure and surfaces
//! as [`Error::MalformedSchema`](crate::Error::MalformedSchema) from
//! [`validate_document`].

use super::types::{escape_pointer_token, ScalarKind, SchemaNode};
use crate::error::Result;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// One step from the root of a value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(&escape_pointer_token(key)),
            PathSegment::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// What went wrong at a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    TypeMismatch { expected: String, found: String },
    MissingField { field: String },
    TooFewItems { min: usize, found: usize },
    NoMatchingAlternative { alternatives: Vec<String> },
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationKind::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {expected}, found {found}")
            }
            ViolationKind::MissingField { field } => write!(f, "missing required field {field}"),
            ViolationKind::TooFewItems { min, found } => {
                write!(f, "expected at least {min} item(s), found {found}")
            }
            ViolationKind::NoMatchingAlternative { alternatives } => {
                write!(f, "value matches none of: {}", alternatives.join(", "))
            }
        }
    }
}

/// A single mismatch between a value and a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Keys and indices from the root to the offending value
    pub path: Vec<PathSegment>,
    pub kind: ViolationKind,
}

impl Violation {
    /// JSON pointer to the offending value (`""` for the root)
    pub fn pointer(&self) -> String {
        self.path.iter().map(|seg| format!("/{seg}")).collect()
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pointer = self.pointer();
        let pointer = if pointer.is_empty() { "/" } else { &pointer };
        write!(f, "{pointer}: {}", self.kind)
    }
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Violation", 3)?;
        s.serialize_field("pointer", &self.pointer())?;
        s.serialize_field("message", &self.message())?;
        s.serialize_field("detail", &self.kind)?;
        s.end()
    }
}

/// Outcome of validating one value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    /// True when no violations were found
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Same as `is_valid`
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    pub fn into_result(self) -> std::result::Result<(), Vec<Violation>> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(self.violations)
        }
    }
}

/// Validate a value against a schema
pub fn validate(value: &Value, schema: &SchemaNode) -> std::result::Result<(), Vec<Violation>> {
    validate_report(value, schema).into_result()
}

/// Validate a value against a schema, returning the full report
pub fn validate_report(value: &Value, schema: &SchemaNode) -> ValidationReport {
    let mut violations = Vec::new();
    let mut path = Vec::new();
    check(value, schema, &mut path, &mut violations);
    tracing::debug!(violations = violations.len(), "Validated value");
    ValidationReport { violations }
}

/// Decode a schema document and validate a value against it
pub fn validate_document(value: &Value, document: &Value) -> Result<ValidationReport> {
    let schema = SchemaNode::from_document(document)?;
    Ok(validate_report(value, &schema))
}

/// Name of a value's runtime type, in schema vocabulary
fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        scalar => ScalarKind::of(scalar).map_or("string", ScalarKind::as_str),
    }
}

fn mismatch(path: &[PathSegment], expected: &str, value: &Value) -> Violation {
    Violation {
        path: path.to_vec(),
        kind: ViolationKind::TypeMismatch {
            expected: expected.to_string(),
            found: value_type_name(value).to_string(),
        },
    }
}

fn check(value: &Value, schema: &SchemaNode, path: &mut Vec<PathSegment>, out: &mut Vec<Violation>) {
    match schema {
        SchemaNode::Scalar(kind) => {
            let accepted = ScalarKind::of(value).is_some_and(|actual| kind.accepts(actual));
            if !accepted {
                out.push(mismatch(path, kind.as_str(), value));
            }
        }
        SchemaNode::Array { items, min_items } => {
            let Value::Array(arr) = value else {
                out.push(mismatch(path, "array", value));
                return;
            };
            if arr.len() < *min_items {
                out.push(Violation {
                    path: path.clone(),
                    kind: ViolationKind::TooFewItems {
                        min: *min_items,
                        found: arr.len(),
                    },
                });
            }
            for (i, item) in arr.iter().enumerate() {
                path.push(PathSegment::Index(i));
                check(item, items, path, out);
                path.pop();
            }
        }
        SchemaNode::Object {
            properties,
            required,
        } => {
            let Value::Object(map) = value else {
                out.push(mismatch(path, "object", value));
                return;
            };
            for key in required {
                if !map.contains_key(key) {
                    out.push(Violation {
                        path: path.clone(),
                        kind: ViolationKind::MissingField { field: key.clone() },
                    });
                }
            }
            for (key, sub_schema) in properties {
                if let Some(sub_value) = map.get(key) {
                    path.push(PathSegment::Key(key.clone()));
                    check(sub_value, sub_schema, path, out);
                    path.pop();
                }
            }
        }
        // The document stays two levels deep; nested arrays below it are unconstrained
        SchemaNode::Union(_) if schema.is_any_item() => {}
        SchemaNode::Union(alternatives) => {
            let matched = alternatives.iter().any(|alt| {
                let mut scratch = Vec::new();
                check(value, alt, &mut path.clone(), &mut scratch);
                scratch.is_empty()
            });
            if !matched {
                out.push(Violation {
                    path: path.clone(),
                    kind: ViolationKind::NoMatchingAlternative {
                        alternatives: alternatives
                            .iter()
                            .map(|alt| alt.type_name().to_string())
                            .collect(),
                    },
                });
            }
        }
    }
}
