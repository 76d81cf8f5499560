// Command-line arguments

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "opa-cli",
    version,
    about = "Command-line client for the Open Policy Agent REST API"
)]
pub struct Cli {
    /// OPA server url, e.g. http://localhost:8181
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Settings file (toml, yaml or json)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Extra request header, "Name: value". Repeatable.
    #[arg(short = 'H', long = "header", global = true, value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Prefer HTTP/2
    #[arg(long, global = true)]
    pub http2: bool,

    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Check server health
    Health,

    /// Evaluate the document at PATH
    Query {
        path: String,

        /// Input as inline JSON
        #[arg(long, conflicts_with = "input_file")]
        input: Option<String>,

        /// Input read from a JSON file
        #[arg(long)]
        input_file: Option<PathBuf>,
    },

    /// Manage data documents
    #[command(subcommand)]
    Data(DataCommand),

    /// Manage policy modules
    #[command(subcommand)]
    Policy(PolicyCommand),
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum DataCommand {
    /// Create or overwrite a document. CONTENT is inline JSON or @file.
    Put { path: String, content: String },
    Get { path: String },
    Delete { path: String },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum PolicyCommand {
    /// Create or update a policy module from a Rego file
    Put { id: String, file: PathBuf },
    Get { id: String },
    List,
    Delete { id: String },
}

pub fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected \"Name: value\", got {:?}", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in {:?}", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
