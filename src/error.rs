//! Error types for api-schema-tester
//!
//! This module defines the error hierarchy for the whole crate.
//! Schema violations are *not* errors: the validator returns them as data.
//! Everything here is a fault that aborts the current operation.

use thiserror::Error;

/// The main error type for api-schema-tester
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Payload Errors
    // ============================================================================
    #[error("JSONPath error: {message}")]
    JsonPath { message: String },

    #[error("Failed to extract payload from path '{path}': {message}")]
    PayloadExtraction { path: String, message: String },

    #[error("Payload is empty, nothing to infer a schema from")]
    EmptyPayload,

    // ============================================================================
    // Schema Errors
    // ============================================================================
    #[error("Malformed schema document at '{pointer}': {message}")]
    MalformedSchema { pointer: String, message: String },

    #[error("Value nesting exceeds the maximum inference depth of {limit}")]
    DepthExceeded { limit: usize },

    #[error("Schema file already exists: {path}")]
    SchemaExists { path: String },

    #[error("Validation failed with {count} violation(s)")]
    ValidationFailed { count: usize },

    // ============================================================================
    // Template Errors
    // ============================================================================
    #[error("Template error: {message}")]
    Template { message: String },

    #[error("Undefined variable in template: {variable}")]
    UndefinedVariable { variable: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a malformed schema error at the given JSON pointer
    pub fn malformed(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedSchema {
            pointer: pointer.into(),
            message: message.into(),
        }
    }

    /// Create a payload extraction error
    pub fn extraction(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PayloadExtraction {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a template error
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Create an undefined variable error
    pub fn undefined_var(variable: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            variable: variable.into(),
        }
    }

    /// Check if this error means an input was broken, as opposed to a
    /// well-formed value that simply failed validation
    pub fn is_fault(&self) -> bool {
        !matches!(self, Error::ValidationFailed { .. })
    }
}

/// Result type alias for api-schema-tester
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
