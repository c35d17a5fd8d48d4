//! CLI commands and argument parsing

use crate::types::Method;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Infer structural schemas from API responses and validate responses against them
#[derive(Parser, Debug)]
#[command(name = "api-schema-tester")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project configuration file (YAML); defaults to ./api-schema-tester.yaml if present
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Infer a schema document from a sample response body
    Infer {
        #[command(flatten)]
        input: InputArgs,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Arrays sampled non-empty must stay non-empty
        #[arg(long)]
        strict_arrays: bool,

        /// Reject samples nested deeper than this
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Validate a response body against a schema document
    Validate {
        #[command(flatten)]
        input: InputArgs,

        /// Schema document to validate against
        #[arg(short, long)]
        schema: PathBuf,
    },

    /// Infer a schema for an endpoint and save it in the schema directory
    Record {
        #[command(flatten)]
        endpoint: EndpointArgs,

        #[command(flatten)]
        input: InputArgs,
    },

    /// Validate a response body against the stored schema for an endpoint
    Check {
        #[command(flatten)]
        endpoint: EndpointArgs,

        #[command(flatten)]
        input: InputArgs,

        /// Print item count and keys of the response before the result
        #[arg(long)]
        summary: bool,
    },

    /// Write a placeholder schema for an endpoint that has none yet
    Init {
        #[command(flatten)]
        endpoint: EndpointArgs,
    },

    /// Print the schema file path for an endpoint
    Locate {
        #[command(flatten)]
        endpoint: EndpointArgs,
    },
}

/// Where the response body comes from
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Response body file, or '-' for stdin
    #[arg(short, long, default_value = "-")]
    pub input: String,

    /// Payload path inside the body (e.g. data, $.data.items[0]); overrides the config
    #[arg(short = 'p', long)]
    pub data_path: Option<String>,
}

/// Which endpoint a schema belongs to
#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    /// HTTP method
    #[arg(short, long, default_value = "GET")]
    pub method: Method,

    /// Route URI, e.g. api/v1/branches/{id}
    #[arg(short, long)]
    pub uri: String,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable output
    Pretty,
}
