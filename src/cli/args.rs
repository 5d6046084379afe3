//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

/// Precache service worker generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Plugin options file, TOML or JSON (default: precache.toml)
    #[arg(short = 'C', long, global = true, default_value = DEFAULT_CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run one build cycle from a stats file
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Rebuild the service worker whenever the stats file changes
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        build_args: BuildArgs,
    },
}

/// Shared arguments for Build and Watch commands
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Bundler stats JSON describing the finished compilation
    #[arg(short, long, default_value = "stats.json", value_hint = clap::ValueHint::FilePath)]
    pub stats: PathBuf,

    /// Override the output directory from the stats file
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output_path: Option<PathBuf>,

    /// Override the public URL prefix from the stats file
    #[arg(short, long, value_hint = clap::ValueHint::Url)]
    pub public_path: Option<String>,

    /// Write the worker to this path instead of <output>/<filename>
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub filepath: Option<PathBuf>,

    /// Minify the generated worker
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Commands {
    pub const fn build_args(&self) -> &BuildArgs {
        match self {
            Self::Build { build_args } | Self::Watch { build_args } => build_args,
        }
    }
}
