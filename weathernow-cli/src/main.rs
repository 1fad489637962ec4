//! Binary crate for the `weathernow` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The interactive search prompt and configuration
//! - Human-friendly output formatting

use clap::Parser;

mod cli;
mod configure;
mod logging;
mod render;
mod search;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
