//! precache - write a precaching service worker for a finished build.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use precache_plugin::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match &cli.command {
        Commands::Build { build_args } => cli::build::build(&cli, build_args).await,
        Commands::Watch { build_args } => cli::watch::watch(&cli, build_args).await,
    }
}
