//! Project configuration
//!
//! Loaded from a YAML file (by default `api-schema-tester.yaml` in the
//! working directory). Every key is optional.
//!
//! ```yaml
//! schema_dir: tests/Schemas
//! file_name: "{{ method }}_{{ name }}.json"
//! data_path: data
//! overwrite: true
//! inference:
//!   strict_arrays: false
//!   max_depth: 64
//! ```

use crate::error::{Error, Result};
use crate::schema::SchemaInferrer;
use crate::template;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "api-schema-tester.yaml";

/// Variables a file name template may reference
const FILE_NAME_VARIABLES: [&str; 3] = ["method", "name", "uri"];

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete project configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Directory holding schema documents
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,

    /// File name template for an endpoint's schema
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Payload path inside response bodies (e.g. `data`)
    #[serde(default)]
    pub data_path: Option<String>,

    /// Replace existing schema files when recording
    #[serde(default = "default_true")]
    pub overwrite: bool,

    /// Inference options
    #[serde(default)]
    pub inference: InferenceConfig,
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("tests/Schemas")
}

fn default_file_name() -> String {
    "{{ method }}_{{ name }}.json".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            schema_dir: default_schema_dir(),
            file_name: default_file_name(),
            data_path: None,
            overwrite: true,
            inference: InferenceConfig::default(),
        }
    }
}

// ============================================================================
// Inference Config
// ============================================================================

/// Options passed to the schema inferrer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InferenceConfig {
    /// Arrays sampled non-empty must stay non-empty
    #[serde(default)]
    pub strict_arrays: bool,

    /// Reject samples nested deeper than this
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl InferenceConfig {
    /// Build an inferrer with these options
    pub fn inferrer(&self) -> SchemaInferrer {
        let inferrer = SchemaInferrer::new().with_strict_arrays(self.strict_arrays);
        match self.max_depth {
            Some(depth) => inferrer.with_max_depth(depth),
            None => inferrer,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl ProjectConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load the given file, or the default file if present, or defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::load(default_path)
        } else {
            tracing::debug!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file is a valid, all-defaults config
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ProjectConfig = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.schema_dir.as_os_str().is_empty() {
            return Err(Error::invalid_value("schema_dir", "cannot be empty"));
        }

        if self.file_name.trim().is_empty() {
            return Err(Error::invalid_value("file_name", "cannot be empty"));
        }
        if !template::has_templates(&self.file_name) {
            return Err(Error::invalid_value(
                "file_name",
                "must reference at least one of {{ method }}, {{ name }}, {{ uri }}",
            ));
        }
        for var in template::extract_variables(&self.file_name) {
            if !FILE_NAME_VARIABLES.contains(&var.as_str()) {
                return Err(Error::invalid_value(
                    "file_name",
                    format!("unknown variable '{var}'"),
                ));
            }
        }

        if self.inference.max_depth == Some(0) {
            return Err(Error::invalid_value(
                "inference.max_depth",
                "must be at least 1",
            ));
        }

        Ok(())
    }
}
