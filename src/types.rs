//! Common types used throughout api-schema-tester
//!
//! Endpoint identity used to name stored schemas.

use serde::{Deserialize, Serialize};

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl Method {
    /// Upper-case method name
    pub fn as_str(self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "PATCH" => Ok(Method::PATCH),
            "DELETE" => Ok(Method::DELETE),
            other => Err(crate::Error::invalid_value(
                "method",
                format!("unsupported HTTP method: {other}"),
            )),
        }
    }
}

// ============================================================================
// Endpoint
// ============================================================================

/// An HTTP method plus a route URI, used to name stored schemas
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub method: Method,
    /// Route URI without a leading slash, e.g. `api/v1/branches/{id}`
    pub uri: String,
}

impl Endpoint {
    /// Create an endpoint; leading and trailing slashes are dropped
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().trim_matches('/').to_string(),
        }
    }

    /// Studly-cased route plus a `Test` suffix:
    /// `api/v1/branches/{id}` becomes `ApiV1BranchesIdTest`
    pub fn studly_name(&self) -> String {
        let mut name: String = self
            .uri
            .split(|c: char| matches!(c, '/' | '-' | '_' | '{' | '}' | '.' | ' '))
            .filter(|word| !word.is_empty())
            .map(capitalize)
            .collect();
        name.push_str("Test");
        name
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} /{}", self.method, self.uri)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
