//! CLI commands and argument parsing

use crate::config::{ENV_BASE_URL, ENV_SECRET, ENV_USER};
use clap::{Parser, Subcommand};

/// Emarsys API client CLI
#[derive(Parser, Debug)]
#[command(name = "emarsys")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API user name
    #[arg(short, long, global = true, env = ENV_USER)]
    pub user: Option<String>,

    /// API secret
    #[arg(short, long, global = true, env = ENV_SECRET, hide_env_values = true)]
    pub secret: Option<String>,

    /// Base URL (defaults to production)
    #[arg(short, long, global = true, env = ENV_BASE_URL)]
    pub base_url: Option<String>,

    /// Send requests to the hosted mock, overriding the base URL
    #[arg(long, global = true)]
    pub mock: bool,

    /// Mark this client as staging; without the flag EMARSYS_STAGING is read
    /// as a boolean (1/t/true, 0/f/false), anything else meaning not staging
    #[arg(long, global = true)]
    pub staging: bool,

    /// Maximum retries per request
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a freshly signed X-WSSE header value
    Wsse,

    /// GET an endpoint and print its data
    Get {
        /// Path under /api/v2, e.g. `settings`
        path: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query", value_parser = parse_key_value)]
        query: Vec<(String, String)>,
    },

    /// POST a JSON body to an endpoint and print its data
    Post {
        /// Path under /api/v2, e.g. `contact/getdata`
        path: String,

        /// Inline request body JSON
        #[arg(long)]
        body: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{s}`"))?;
    Ok((key.to_string(), value.to_string()))
}
