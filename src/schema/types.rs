//! Schema types and the persisted document codec

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

/// Items schema written for arrays sampled empty
static ANY_ITEM: LazyLock<SchemaNode> = LazyLock::new(SchemaNode::build_any_item);

/// Kind of a scalar JSON value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

impl ScalarKind {
    /// All scalar kinds, in document order
    pub const ALL: [ScalarKind; 5] = [
        ScalarKind::String,
        ScalarKind::Integer,
        ScalarKind::Number,
        ScalarKind::Boolean,
        ScalarKind::Null,
    ];

    /// Classify a JSON value. Returns `None` for arrays and objects.
    ///
    /// Numbers without a fractional component are `Integer`. A number that
    /// cannot be read as `f64` degrades to `String`.
    pub fn of(value: &Value) -> Option<ScalarKind> {
        match value {
            Value::Null => Some(ScalarKind::Null),
            Value::Bool(_) => Some(ScalarKind::Boolean),
            Value::String(_) => Some(ScalarKind::String),
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    return Some(ScalarKind::Integer);
                }
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 => Some(ScalarKind::Integer),
                    Some(_) => Some(ScalarKind::Number),
                    None => Some(ScalarKind::String),
                }
            }
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Name used in schema documents
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Number => "number",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Null => "null",
        }
    }

    /// Parse a document type name
    pub fn parse(name: &str) -> Option<ScalarKind> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Check whether a value of kind `actual` satisfies this kind.
    /// Integers widen to `number`; nothing else converts.
    pub fn accepts(self, actual: ScalarKind) -> bool {
        self == actual || (self == ScalarKind::Number && actual == ScalarKind::Integer)
    }
}

impl std::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural description of a JSON value at one position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    /// A scalar of one kind
    Scalar(ScalarKind),
    /// An array whose elements all match `items`
    Array {
        items: Box<SchemaNode>,
        min_items: usize,
    },
    /// An open object; unknown keys are allowed
    Object {
        properties: BTreeMap<String, SchemaNode>,
        required: BTreeSet<String>,
    },
    /// Any one of the alternatives
    Union(Vec<SchemaNode>),
}

impl SchemaNode {
    /// Create a scalar node
    pub fn scalar(kind: ScalarKind) -> Self {
        SchemaNode::Scalar(kind)
    }

    /// Create an array node
    pub fn array(items: SchemaNode, min_items: usize) -> Self {
        SchemaNode::Array {
            items: Box::new(items),
            min_items,
        }
    }

    /// Create an object node where every property is required
    pub fn object(properties: BTreeMap<String, SchemaNode>) -> Self {
        let required = properties.keys().cloned().collect();
        SchemaNode::Object {
            properties,
            required,
        }
    }

    /// Create an object node with an explicit required set
    pub fn object_with_required(
        properties: BTreeMap<String, SchemaNode>,
        required: BTreeSet<String>,
    ) -> Self {
        SchemaNode::Object {
            properties,
            required,
        }
    }

    /// Open object with no known properties, written before any sample exists
    pub fn placeholder() -> Self {
        SchemaNode::object(BTreeMap::new())
    }

    /// Items schema for an array observed empty: any scalar, any object,
    /// or an array of those. The validator accepts any shape at any depth
    /// where this exact union appears.
    pub fn any_item() -> Self {
        ANY_ITEM.clone()
    }

    /// Check whether this node is the empty-array fallback union
    pub fn is_any_item(&self) -> bool {
        *self == *ANY_ITEM
    }

    fn build_any_item() -> Self {
        let mut leaf: Vec<SchemaNode> = ScalarKind::ALL
            .into_iter()
            .filter(|k| *k != ScalarKind::Null)
            .map(SchemaNode::Scalar)
            .collect();
        leaf.push(SchemaNode::object(BTreeMap::new()));
        leaf.push(SchemaNode::Scalar(ScalarKind::Null));

        let mut alternatives = leaf.clone();
        alternatives.insert(alternatives.len() - 1, SchemaNode::array(SchemaNode::Union(leaf), 0));
        SchemaNode::Union(alternatives)
    }

    /// Short name of the node, as it appears in violation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaNode::Scalar(kind) => kind.as_str(),
            SchemaNode::Array { .. } => "array",
            SchemaNode::Object { .. } => "object",
            SchemaNode::Union(_) => "oneOf",
        }
    }

    /// Total number of nodes in the tree
    pub fn node_count(&self) -> usize {
        1 + match self {
            SchemaNode::Scalar(_) => 0,
            SchemaNode::Array { items, .. } => items.node_count(),
            SchemaNode::Object { properties, .. } => {
                properties.values().map(SchemaNode::node_count).sum()
            }
            SchemaNode::Union(alternatives) => {
                alternatives.iter().map(SchemaNode::node_count).sum()
            }
        }
    }

    /// Encode as a schema document
    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();
        match self {
            SchemaNode::Scalar(kind) => {
                doc.insert("type".into(), Value::String(kind.as_str().into()));
            }
            SchemaNode::Array { items, min_items } => {
                doc.insert("type".into(), Value::String("array".into()));
                doc.insert("items".into(), items.to_document());
                doc.insert("minItems".into(), Value::from(*min_items));
            }
            SchemaNode::Object {
                properties,
                required,
            } => {
                let props: Map<String, Value> = properties
                    .iter()
                    .map(|(key, node)| (key.clone(), node.to_document()))
                    .collect();
                doc.insert("type".into(), Value::String("object".into()));
                doc.insert("properties".into(), Value::Object(props));
                doc.insert(
                    "required".into(),
                    Value::Array(required.iter().cloned().map(Value::String).collect()),
                );
            }
            SchemaNode::Union(alternatives) => {
                doc.insert(
                    "oneOf".into(),
                    Value::Array(alternatives.iter().map(SchemaNode::to_document).collect()),
                );
            }
        }
        Value::Object(doc)
    }

    /// Encode as a pretty-printed document
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.to_document()).unwrap_or_default()
    }

    /// Decode a schema document
    pub fn from_document(doc: &Value) -> Result<Self> {
        decode_node(doc, "")
    }

    /// Parse and decode a schema document from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(text)
            .map_err(|e| Error::malformed("", format!("document is not valid JSON: {e}")))?;
        Self::from_document(&doc)
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_document().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SchemaNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let doc = Value::deserialize(deserializer)?;
        SchemaNode::from_document(&doc).map_err(serde::de::Error::custom)
    }
}

/// Escape one JSON pointer reference token
pub(crate) fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

fn decode_node(doc: &Value, pointer: &str) -> Result<SchemaNode> {
    let Value::Object(map) = doc else {
        return Err(Error::malformed(pointer, "schema node must be a JSON object"));
    };

    if let Some(one_of) = map.get("oneOf") {
        if map.contains_key("type") {
            return Err(Error::malformed(
                pointer,
                "'type' and 'oneOf' cannot appear together",
            ));
        }
        let Value::Array(alternatives) = one_of else {
            return Err(Error::malformed(
                format!("{pointer}/oneOf"),
                "'oneOf' must be an array",
            ));
        };
        if alternatives.is_empty() {
            return Err(Error::malformed(
                format!("{pointer}/oneOf"),
                "'oneOf' must list at least one alternative",
            ));
        }
        let nodes = alternatives
            .iter()
            .enumerate()
            .map(|(i, alt)| decode_node(alt, &format!("{pointer}/oneOf/{i}")))
            .collect::<Result<Vec<_>>>()?;
        return Ok(SchemaNode::Union(nodes));
    }

    let type_name = match map.get("type") {
        Some(Value::String(name)) => name.as_str(),
        Some(_) => {
            return Err(Error::malformed(
                format!("{pointer}/type"),
                "'type' must be a string",
            ))
        }
        None => return Err(Error::malformed(pointer, "missing 'type'")),
    };

    match type_name {
        "array" => decode_array(map, pointer),
        "object" => decode_object(map, pointer),
        other => ScalarKind::parse(other)
            .map(SchemaNode::Scalar)
            .ok_or_else(|| {
                Error::malformed(
                    format!("{pointer}/type"),
                    format!("unrecognized type '{other}'"),
                )
            }),
    }
}

fn decode_array(map: &Map<String, Value>, pointer: &str) -> Result<SchemaNode> {
    let items = map
        .get("items")
        .ok_or_else(|| Error::malformed(pointer, "array schema is missing 'items'"))?;
    let items = decode_node(items, &format!("{pointer}/items"))?;

    let min_items = match map.get("minItems") {
        None => 0,
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                Error::malformed(
                    format!("{pointer}/minItems"),
                    "'minItems' must be a non-negative integer",
                )
            })?,
    };

    Ok(SchemaNode::array(items, min_items))
}

fn decode_object(map: &Map<String, Value>, pointer: &str) -> Result<SchemaNode> {
    let mut properties = BTreeMap::new();
    match map.get("properties") {
        None => {}
        Some(Value::Object(props)) => {
            for (key, sub) in props {
                let sub_pointer = format!("{pointer}/properties/{}", escape_pointer_token(key));
                properties.insert(key.clone(), decode_node(sub, &sub_pointer)?);
            }
        }
        Some(_) => {
            return Err(Error::malformed(
                format!("{pointer}/properties"),
                "'properties' must be an object",
            ))
        }
    }

    let mut required = BTreeSet::new();
    match map.get("required") {
        None => {}
        Some(Value::Array(keys)) => {
            for (i, key) in keys.iter().enumerate() {
                let Value::String(key) = key else {
                    return Err(Error::malformed(
                        format!("{pointer}/required/{i}"),
                        "required entries must be strings",
                    ));
                };
                required.insert(key.clone());
            }
        }
        Some(_) => {
            return Err(Error::malformed(
                format!("{pointer}/required"),
                "'required' must be an array",
            ))
        }
    }

    Ok(SchemaNode::object_with_required(properties, required))
}
