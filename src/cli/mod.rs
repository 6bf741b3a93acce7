//! CLI entry point for bim-setup.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// BIM project setup CLI
#[derive(Parser, Debug)]
#[command(name = "bim-setup", version, about = "Authorize and read BIM 360 resources")]
pub struct Cli {
    /// TOML config file; environment variables override its values
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the authorization URL instead of opening a browser
    #[arg(long, global = true)]
    pub no_browser: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the browser authorization flow and report the result
    Login,
    /// Read every page of a collection and print it as JSON
    Fetch(ResourceArgs),
    /// Read a single resource and print it as JSON
    Get(ResourceArgs),
}

/// Arguments shared by `fetch` and `get`.
#[derive(Parser, Debug)]
pub struct ResourceArgs {
    /// Path template, e.g. cost/v1/containers/{ContainerId}/templates
    pub template: String,

    /// Placeholder value as Name=value (repeatable)
    #[arg(short, long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected Name=value, got '{raw}'")),
    }
}
