//! # api-schema-tester
//!
//! Infer a structural schema from one sampled API response, store it next
//! to your tests, and re-validate later responses against it.
//!
//! ## Features
//!
//! - **Sample-based Inference**: One JSON value in, one schema out
//! - **Permissive Validation**: Unknown keys pass, integers widen to numbers
//! - **Accumulated Violations**: Every mismatch reported with a JSON pointer
//! - **Stable Documents**: Sorted, pretty-printed JSON that diffs cleanly
//! - **Schema Store**: One file per endpoint, named from a template
//!
//! ## Quick Start
//!
//! ```rust
//! use api_schema_tester::schema::{infer_schema, validate};
//! use serde_json::json;
//!
//! let schema = infer_schema(&json!({"id": 1, "name": "Main"}));
//!
//! assert!(validate(&json!({"id": 2, "name": "Side", "extra": true}), &schema).is_ok());
//!
//! let violations = validate(&json!({"id": "2"}), &schema).unwrap_err();
//! assert_eq!(violations.len(), 2);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! response body ──► extract ──► schema::infer ──► store (GET_ApiV1BranchesTest.json)
//!                                                    │
//! response body ──► extract ──► schema::validate ◄───┘ ──► violations
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types
pub mod types;

/// Schema inference, validation and document codec
pub mod schema;

/// Payload extraction from response bodies
pub mod extract;

/// Project configuration
pub mod config;

/// Schema document storage
pub mod store;

/// Template interpolation
pub mod template;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use schema::{infer_schema, validate, SchemaInferrer, SchemaNode, Violation};
pub use types::{Endpoint, Method};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
