//! Schema inference and validation
//!
//! Turns one sampled JSON value into a structural schema and checks later
//! values against it.
//!
//! # Features
//!
//! - **Type Inference**: Infers scalar kinds, arrays and objects from a sample
//! - **Empty Array Fallback**: Arrays sampled empty accept any items
//! - **Open Objects**: Unknown keys never fail validation
//! - **Accumulated Violations**: Every mismatch is reported with its path
//! - **Document Codec**: Stable, diffable JSON documents using
//!   `type`/`properties`/`required`/`items`/`minItems`/`oneOf`

mod inference;
mod types;
mod validation;

pub use inference::{infer_schema, nesting_depth, SchemaInferrer};
pub use types::{ScalarKind, SchemaNode};
pub use validation::{
    validate, validate_document, validate_report, PathSegment, ValidationReport, Violation,
    ViolationKind,
};

#[cfg(test)]
mod tests;
