// Allow common clippy pedantic lints
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! Emarsys API CLI
//!
//! Signs and sends requests against the Emarsys API

use clap::Parser;
use emarsys_client::cli::{Cli, Runner};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
