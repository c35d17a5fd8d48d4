//! Schema store
//!
//! File-based persistence of schema documents, one file per endpoint,
//! with atomic writes.

use crate::config::ProjectConfig;
use crate::error::{Error, Result};
use crate::schema::SchemaNode;
use crate::template::{self, TemplateContext};
use crate::types::Endpoint;
use std::path::{Path, PathBuf};

/// Directory of schema documents
#[derive(Debug, Clone)]
pub struct SchemaStore {
    /// Directory holding the documents
    dir: PathBuf,
    /// File name template
    file_name: String,
    /// Whether existing files may be replaced
    overwrite: bool,
}

impl SchemaStore {
    /// Create a store in `dir` with the default file name template
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let defaults = ProjectConfig::default();
        Self {
            dir: dir.as_ref().to_path_buf(),
            file_name: defaults.file_name,
            overwrite: defaults.overwrite,
        }
    }

    /// Create a store from project configuration
    pub fn from_config(config: &ProjectConfig) -> Self {
        Self {
            dir: config.schema_dir.clone(),
            file_name: config.file_name.clone(),
            overwrite: config.overwrite,
        }
    }

    /// Set the file name template
    #[must_use]
    pub fn with_file_name(mut self, template: impl Into<String>) -> Self {
        self.file_name = template.into();
        self
    }

    /// Allow/forbid replacing existing files
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the schema document for an endpoint
    pub fn path_for(&self, endpoint: &Endpoint) -> Result<PathBuf> {
        let ctx = TemplateContext::for_endpoint(endpoint);
        let name = template::render(&self.file_name, &ctx)?;

        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::template(format!(
                "file name '{name}' rendered for {endpoint} is not a plain file name"
            )));
        }

        Ok(self.dir.join(name))
    }

    /// Check whether a schema exists for an endpoint
    pub fn exists(&self, endpoint: &Endpoint) -> Result<bool> {
        Ok(self.path_for(endpoint)?.exists())
    }

    /// Write the schema for an endpoint, returning the file path
    pub fn save(&self, endpoint: &Endpoint, schema: &SchemaNode) -> Result<PathBuf> {
        let path = self.path_for(endpoint)?;

        if path.exists() {
            if !self.overwrite {
                return Err(Error::SchemaExists {
                    path: path.display().to_string(),
                });
            }
            tracing::warn!(path = %path.display(), "Overwriting existing schema");
        }

        write_document(&path, schema)?;
        tracing::info!(%endpoint, path = %path.display(), "Saved schema");
        Ok(path)
    }

    /// Write a placeholder schema for an endpoint unless one exists.
    /// Returns `true` when a file was created.
    pub fn init(&self, endpoint: &Endpoint) -> Result<bool> {
        let path = self.path_for(endpoint)?;
        if path.exists() {
            return Ok(false);
        }

        write_document(&path, &SchemaNode::placeholder())?;
        tracing::info!(%endpoint, path = %path.display(), "Wrote placeholder schema");
        Ok(true)
    }

    /// Read the schema for an endpoint
    pub fn load(&self, endpoint: &Endpoint) -> Result<SchemaNode> {
        let path = self.path_for(endpoint)?;
        read_document(&path)
    }
}

/// Write a schema document, creating parent directories.
///
/// The document goes to a temp file first and is renamed into place.
pub fn write_document(path: &Path, schema: &SchemaNode) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut contents = schema.to_json_pretty();
    contents.push('\n');

    let temp_path = temp_path_for(path);
    std::fs::write(&temp_path, contents)?;
    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(Error::Io(e));
    }
    Ok(())
}

/// Sibling temp file: `x.json` becomes `x.json.tmp`, never the target itself
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read and decode a schema document
pub fn read_document(path: &Path) -> Result<SchemaNode> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::Io(e)
        }
    })?;
    let schema = SchemaNode::from_json_str(&contents)?;
    tracing::debug!(path = %path.display(), nodes = schema.node_count(), "Loaded schema");
    Ok(schema)
}
