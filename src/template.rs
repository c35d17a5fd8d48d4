//! Template interpolation for schema file names
//!
//! Handles `{{ variable }}` interpolation in configured file name patterns.
//! The variables are `method`, `name` and `uri`.

use crate::error::{Error, Result};
use crate::types::Endpoint;
use regex::Regex;
use std::sync::LazyLock;

/// Regex for matching template variables: {{ variable.path }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}").unwrap()
});

/// Variables available to file name templates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    /// Upper-case HTTP method
    pub method: String,
    /// Studly route name with a `Test` suffix
    pub name: String,
    /// Route URI with `/` flattened to `_`
    pub uri: String,
}

impl TemplateContext {
    /// Create a context exposing an endpoint's naming variables
    pub fn for_endpoint(endpoint: &Endpoint) -> Self {
        Self {
            method: endpoint.method.as_str().to_string(),
            name: endpoint.studly_name(),
            uri: endpoint.uri.replace('/', "_"),
        }
    }

    /// Look up a variable by name
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "method" => Some(&self.method),
            "name" => Some(&self.name),
            "uri" => Some(&self.uri),
            _ => None,
        }
    }
}

/// Render a template string with the given context
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String> {
    let mut result = template.to_string();
    let mut errors = Vec::new();

    for cap in TEMPLATE_REGEX.captures_iter(template) {
        let full_match = &cap[0];
        let var_path = &cap[1];

        match ctx.get(var_path) {
            Some(value) => {
                result = result.replace(full_match, value);
            }
            None => {
                errors.push(var_path.to_string());
            }
        }
    }

    if errors.is_empty() {
        Ok(result)
    } else {
        Err(Error::undefined_var(errors.join(", ")))
    }
}

/// Check if a string contains template variables
pub fn has_templates(s: &str) -> bool {
    TEMPLATE_REGEX.is_match(s)
}

/// Extract all variable names from a template
pub fn extract_variables(template: &str) -> Vec<String> {
    TEMPLATE_REGEX
        .captures_iter(template)
        .map(|cap| cap[1].to_string())
        .collect()
}
