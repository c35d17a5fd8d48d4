//! Schema inference from a single JSON sample

use super::types::{ScalarKind, SchemaNode};
use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// Schema inferrer with configuration options
#[derive(Debug, Clone, Default)]
pub struct SchemaInferrer {
    /// Maximum nesting depth accepted by `try_infer`
    max_depth: Option<usize>,
    /// Require at least one item in arrays sampled non-empty
    strict_arrays: bool,
}

impl SchemaInferrer {
    /// Create a new schema inferrer with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum nesting depth
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Enable/disable strict arrays
    #[must_use]
    pub fn with_strict_arrays(mut self, enabled: bool) -> Self {
        self.strict_arrays = enabled;
        self
    }

    /// Configured depth ceiling
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Infer a schema from one sample. Never fails and ignores the depth ceiling.
    pub fn infer(&self, value: &Value) -> SchemaNode {
        let node = self.infer_node(value);
        tracing::debug!(nodes = node.node_count(), root = node.type_name(), "Inferred schema");
        node
    }

    /// Infer a schema, first rejecting values nested deeper than `max_depth`
    pub fn try_infer(&self, value: &Value) -> Result<SchemaNode> {
        if let Some(limit) = self.max_depth {
            let depth = nesting_depth(value);
            if depth > limit {
                tracing::debug!(depth, limit, "Sample too deep for inference");
                return Err(Error::DepthExceeded { limit });
            }
        }
        Ok(self.infer(value))
    }

    fn infer_node(&self, value: &Value) -> SchemaNode {
        match value {
            Value::Array(arr) => self.infer_array(arr),
            Value::Object(map) => self.infer_object(map),
            scalar => SchemaNode::Scalar(ScalarKind::of(scalar).unwrap_or(ScalarKind::String)),
        }
    }

    /// Only the first element is inspected
    fn infer_array(&self, arr: &[Value]) -> SchemaNode {
        match arr.first() {
            None => SchemaNode::array(SchemaNode::any_item(), 0),
            Some(first) => {
                let min_items = usize::from(self.strict_arrays);
                SchemaNode::array(self.infer_node(first), min_items)
            }
        }
    }

    fn infer_object(&self, map: &serde_json::Map<String, Value>) -> SchemaNode {
        let properties: BTreeMap<String, SchemaNode> = map
            .iter()
            .map(|(key, val)| (key.clone(), self.infer_node(val)))
            .collect();

        // Single sample: every observed key is required
        SchemaNode::object(properties)
    }
}

/// Infer schema from a single JSON value (convenience function)
pub fn infer_schema(value: &Value) -> SchemaNode {
    SchemaInferrer::new().infer(value)
}

/// Container nesting depth of a value; scalars are 0, `[]` and `{}` are 1.
///
/// Iterative so that absurdly deep input cannot overflow the stack before
/// the ceiling is checked.
pub fn nesting_depth(value: &Value) -> usize {
    let mut max = 0;
    let mut stack = vec![(value, 0usize)];
    while let Some((current, depth)) = stack.pop() {
        match current {
            Value::Array(arr) => {
                max = max.max(depth + 1);
                stack.extend(arr.iter().map(|v| (v, depth + 1)));
            }
            Value::Object(map) => {
                max = max.max(depth + 1);
                stack.extend(map.values().map(|v| (v, depth + 1)));
            }
            _ => {}
        }
    }
    max
}
