//! `build` command: one cycle from a stats file.

use anyhow::{Context, Result};
use std::path::Path;

use super::{BuildArgs, Cli};
use crate::config::{PluginConfig, PluginOptions, find_config_file};
use crate::log;
use crate::logger;
use crate::pipeline::{Compilation, Pipeline};
use crate::plugin::ServiceWorkerPlugin;

/// Options from the config file (if any) with CLI flags layered on top.
pub fn load_config(cli: &Cli, args: &BuildArgs) -> Result<PluginConfig> {
    let mut options = match find_config_file(&cli.config) {
        Some(path) => PluginOptions::from_path(&path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None if is_default_config(&cli.config) => PluginOptions::default(),
        None => anyhow::bail!("config file not found: {}", cli.config.display()),
    };

    apply_args(&mut options, args);
    logger::set_verbose(options.verbose.unwrap_or(false));
    PluginConfig::new(options).context("invalid plugin options")
}

fn is_default_config(path: &Path) -> bool {
    path == Path::new(crate::config::DEFAULT_CONFIG_FILE)
}

/// Layer CLI flags over file options.
fn apply_args(options: &mut PluginOptions, args: &BuildArgs) {
    update_option(&mut options.minify, args.minify.as_ref());
    if args.filepath.is_some() {
        options.filepath = args.filepath.clone();
    }
    if args.verbose {
        options.verbose = Some(true);
    }
}

/// Update config option if CLI value is provided.
fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
    if let Some(option) = cli_option {
        *config_option = option.clone();
    }
}

/// Read the stats file and apply path overrides.
pub fn load_compilation(args: &BuildArgs) -> Result<Compilation> {
    let mut compilation = Compilation::from_stats_path(&args.stats)
        .with_context(|| format!("failed to read stats {}", args.stats.display()))?;

    if let Some(output) = &args.output_path {
        compilation.output_path = output.clone();
    }
    if let Some(public) = &args.public_path {
        compilation.public_path = public.clone();
    }
    Ok(compilation)
}

/// Pipeline with the service worker plugin registered.
pub fn pipeline(config: PluginConfig) -> Pipeline {
    Pipeline::new().with_plugin(ServiceWorkerPlugin::new(config))
}

/// Load the compilation, fire the hook and report warnings.
pub async fn run_cycle(pipeline: &mut Pipeline, args: &BuildArgs) -> Result<Vec<String>> {
    let mut compilation = load_compilation(args)?;
    pipeline.emit(&mut compilation).await?;

    let warnings: Vec<String> = compilation.warnings.iter().map(ToString::to_string).collect();
    Ok(warnings)
}

/// Entry point for `precache build`.
pub async fn build(cli: &Cli, args: &BuildArgs) -> Result<()> {
    let config = load_config(cli, args)?;
    let mut pipeline = pipeline(config);

    for warning in run_cycle(&mut pipeline, args).await? {
        log!("warning"; "{}", warning);
    }
    Ok(())
}
