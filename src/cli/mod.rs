//! CLI module
//!
//! Command-line interface over the schema engine.
//!
//! # Commands
//!
//! - `infer` - Infer a schema document from a response body
//! - `validate` - Validate a response body against a schema document
//! - `record` - Infer and save the schema for an endpoint
//! - `check` - Validate a response body against an endpoint's stored schema
//! - `init` - Write a placeholder schema for an endpoint without one
//! - `locate` - Print the schema path for an endpoint

mod commands;
mod runner;

pub use commands::{Cli, Commands, EndpointArgs, InputArgs, OutputFormat};
pub use runner::Runner;
