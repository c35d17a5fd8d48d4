//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, EndpointArgs, InputArgs, OutputFormat};
use crate::config::ProjectConfig;
use crate::error::{Error, Result, ResultExt};
use crate::extract::{extract_payload, is_empty_payload, parse_body, ResponseSummary};
use crate::schema::{validate_report, SchemaNode, ValidationReport};
use crate::store::{self, SchemaStore};
use crate::types::Endpoint;
use serde_json::{json, Value};
use std::io::Read;
use std::path::{Path, PathBuf};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        let config = ProjectConfig::discover(self.cli.config.as_deref())?;

        match &self.cli.command {
            Commands::Infer {
                input,
                out,
                strict_arrays,
                max_depth,
            } => self.infer(&config, input, out.as_deref(), *strict_arrays, *max_depth),
            Commands::Validate { input, schema } => self.validate(&config, input, schema),
            Commands::Record { endpoint, input } => self.record(&config, endpoint, input),
            Commands::Check {
                endpoint,
                input,
                summary,
            } => self.check(&config, endpoint, input, *summary),
            Commands::Init { endpoint } => self.init(&config, endpoint),
            Commands::Locate { endpoint } => self.locate(&config, endpoint),
        }
    }

    /// Infer a schema and print or write it
    fn infer(
        &self,
        config: &ProjectConfig,
        input: &InputArgs,
        out: Option<&Path>,
        strict_arrays: bool,
        max_depth: Option<usize>,
    ) -> Result<()> {
        let payload = self.read_payload(config, input)?;

        let mut inference = config.inference.clone();
        inference.strict_arrays |= strict_arrays;
        if max_depth.is_some() {
            inference.max_depth = max_depth;
        }
        let schema = inference.inferrer().try_infer(&payload)?;

        match out {
            Some(path) => {
                store::write_document(path, &schema)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                tracing::info!(path = %path.display(), "Wrote schema");
                self.print_path(path);
            }
            None => println!("{}", schema.to_json_pretty()),
        }
        Ok(())
    }

    /// Validate a body against a schema file
    fn validate(&self, config: &ProjectConfig, input: &InputArgs, schema: &Path) -> Result<()> {
        let schema = store::read_document(schema)?;
        let payload = self.read_payload(config, input)?;
        self.report(&payload, &schema, None)
    }

    /// Infer and store the schema for an endpoint
    fn record(
        &self,
        config: &ProjectConfig,
        endpoint: &EndpointArgs,
        input: &InputArgs,
    ) -> Result<()> {
        let endpoint = Endpoint::new(endpoint.method, &endpoint.uri);
        let payload = self.read_payload(config, input)?;

        if is_empty_payload(&payload) {
            tracing::warn!(%endpoint, "Empty payload, not recording a schema");
            return Err(Error::EmptyPayload);
        }

        let schema = config.inference.inferrer().try_infer(&payload)?;
        let path = SchemaStore::from_config(config).save(&endpoint, &schema)?;
        self.print_path(&path);
        Ok(())
    }

    /// Validate a body against the stored schema for an endpoint
    fn check(
        &self,
        config: &ProjectConfig,
        endpoint: &EndpointArgs,
        input: &InputArgs,
        summary: bool,
    ) -> Result<()> {
        let endpoint = Endpoint::new(endpoint.method, &endpoint.uri);
        let schema = SchemaStore::from_config(config).load(&endpoint)?;

        let (raw, body) = self.read_body(input)?;
        let summary = summary.then(|| ResponseSummary::of(&raw, &body));
        let payload = select_payload(config, input, &body)?;
        self.report(&payload, &schema, summary.as_ref())
    }

    /// Write a placeholder schema unless the endpoint already has one
    fn init(&self, config: &ProjectConfig, endpoint: &EndpointArgs) -> Result<()> {
        let endpoint = Endpoint::new(endpoint.method, &endpoint.uri);
        let store = SchemaStore::from_config(config);

        if !store.init(&endpoint)? {
            tracing::info!(%endpoint, "Schema already exists, left unchanged");
        }
        self.print_path(&store.path_for(&endpoint)?);
        Ok(())
    }

    /// Print where the schema for an endpoint lives
    fn locate(&self, config: &ProjectConfig, endpoint: &EndpointArgs) -> Result<()> {
        let endpoint = Endpoint::new(endpoint.method, &endpoint.uri);
        let path = SchemaStore::from_config(config).path_for(&endpoint)?;
        self.print_path(&path);
        Ok(())
    }

    /// Read and parse the body, keeping the raw text
    fn read_body(&self, input: &InputArgs) -> Result<(String, Value)> {
        let raw = read_input(&input.input)?;
        let body = parse_body(&raw).with_context(|| format!("Invalid JSON in {}", input.input))?;
        Ok((raw, body))
    }

    /// Read the body and select the payload
    fn read_payload(&self, config: &ProjectConfig, input: &InputArgs) -> Result<Value> {
        let (_, body) = self.read_body(input)?;
        select_payload(config, input, &body)
    }

    /// Validate and print the outcome; violations become an error exit
    fn report(
        &self,
        payload: &Value,
        schema: &SchemaNode,
        summary: Option<&ResponseSummary>,
    ) -> Result<()> {
        let report = validate_report(payload, schema);
        self.print_report(&report, summary)?;

        if report.is_valid() {
            Ok(())
        } else {
            Err(Error::ValidationFailed {
                count: report.len(),
            })
        }
    }

    fn print_report(
        &self,
        report: &ValidationReport,
        summary: Option<&ResponseSummary>,
    ) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => {
                let mut out = json!({
                    "valid": report.is_valid(),
                    "violations": report.violations(),
                });
                if let Some(summary) = summary {
                    out["summary"] = serde_json::to_value(summary)?;
                }
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            OutputFormat::Pretty => {
                if let Some(summary) = summary {
                    println!("{summary}");
                }
                if report.is_valid() {
                    println!("OK: response matches schema");
                } else {
                    for violation in report.violations() {
                        println!("  {violation}");
                    }
                }
            }
        }
        Ok(())
    }

    fn print_path(&self, path: &Path) {
        match self.cli.format {
            OutputFormat::Json => println!("{}", json!({ "path": path.display().to_string() })),
            OutputFormat::Pretty => println!("{}", path.display()),
        }
    }
}

/// Payload at the CLI data path, else the configured one
fn select_payload(config: &ProjectConfig, input: &InputArgs, body: &Value) -> Result<Value> {
    let data_path = input.data_path.as_deref().or(config.data_path.as_deref());
    extract_payload(body, data_path)
}

/// Read a file, or stdin for `-`
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }

    let path = PathBuf::from(input);
    std::fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::Io(e)
        }
    })
}
