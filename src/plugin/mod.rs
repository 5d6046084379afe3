//! Service worker plugin.
//!
//! # Module Structure
//!
//! ```text
//! plugin/
//! ├── derive      # file list + prefix mapping from the compilation
//! ├── scripts     # importScripts placeholder resolution
//! ├── write       # scoped delete + atomic write
//! ├── error       # PluginError, ConfigurationWarning
//! └── mod.rs      # ServiceWorkerPlugin (this file)
//! ```
//!
//! # Build Cycle
//!
//! ```text
//! after_emit(compilation)
//!   ├── configure        DerivedState + OverrideSet (no I/O)
//!   ├── create_manifest  generator (blocking pool) → optional minify
//!   └── write_manifest   delete previous → write
//! ```
//!
//! Per-cycle state is replaced wholesale by the next `configure`.

mod derive;
mod error;
mod scripts;
mod write;


pub use derive::derive;
pub use error::{ConfigurationWarning, PluginError};
pub use write::WriteError;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{DerivedState, GeneratorConfig, OverrideSet, PluginConfig};
use crate::generator::{GenerationError, ManifestGenerator, PrecacheGenerator};
use crate::minify::{Minifier, OxcMinifier};
use crate::pipeline::{BuildPlugin, BuildWarning, Compilation, HookFuture};
use crate::{debug, log};

/// Name reported to the pipeline.
pub const PLUGIN_NAME: &str = "precache";

/// State computed by one `configure` call.
#[derive(Debug, Clone)]
struct BuildCycle {
    derived: DerivedState,
    overrides: OverrideSet,
    warnings: Vec<ConfigurationWarning>,
}

/// Hooks a build pipeline and writes a precaching service worker.
pub struct ServiceWorkerPlugin {
    config: PluginConfig,
    generator: Arc<dyn ManifestGenerator>,
    minifier: Arc<dyn Minifier>,
    cycle: Option<BuildCycle>,
}

impl ServiceWorkerPlugin {
    /// Plugin with the built-in generator and oxc minifier.
    pub fn new(config: PluginConfig) -> Self {
        Self::with_backends(config, Arc::new(PrecacheGenerator), Arc::new(OxcMinifier))
    }

    pub fn with_backends(
        config: PluginConfig,
        generator: Arc<dyn ManifestGenerator>,
        minifier: Arc<dyn Minifier>,
    ) -> Self {
        Self {
            config,
            generator,
            minifier,
            cycle: None,
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Derived state of the current cycle.
    pub fn derived(&self) -> Option<&DerivedState> {
        self.cycle.as_ref().map(|c| &c.derived)
    }

    /// Override set of the current cycle.
    pub fn overrides(&self) -> Option<&OverrideSet> {
        self.cycle.as_ref().map(|c| &c.overrides)
    }

    /// Warnings raised by the current cycle's `configure`.
    pub fn warnings(&self) -> &[ConfigurationWarning] {
        self.cycle.as_ref().map_or(&[][..], |c| c.warnings.as_slice())
    }

    /// Compute this cycle's derived state and overrides.
    ///
    /// Replaces whatever the previous cycle left behind. On error the
    /// previous cycle is cleared as well.
    pub fn configure(&mut self, compilation: &Compilation) -> Result<(), PluginError> {
        self.cycle = None;

        let derived = derive(&self.config, compilation);
        let import_scripts =
            scripts::resolve_all(&self.config.options().import_scripts, compilation)?;

        let mut warnings = Vec::new();
        let filepath = match self.config.filepath() {
            Some(path) => {
                warnings.push(ConfigurationWarning::CustomFilepath(path.to_path_buf()));
                path.to_path_buf()
            }
            None => derived.output_dir.join(self.config.filename()),
        };

        debug!(
            "precache";
            "{} files, {} prefixes, worker at {}",
            derived.static_file_globs.len(),
            derived.strip_prefix_multi.len(),
            filepath.display()
        );

        self.cycle = Some(BuildCycle {
            derived,
            overrides: OverrideSet {
                import_scripts,
                filepath,
            },
            warnings,
        });
        Ok(())
    }

    /// Merged generator payload for the current cycle.
    pub fn generator_config(&self) -> Result<GeneratorConfig, PluginError> {
        let cycle = self.cycle.as_ref().ok_or(PluginError::NotConfigured)?;
        Ok(GeneratorConfig::resolve(
            self.config.options(),
            &cycle.derived,
            &cycle.overrides,
        ))
    }

    /// Generate the worker script, minified if configured.
    pub async fn create_manifest(&self) -> Result<String, PluginError> {
        let payload = self.generator_config()?;
        let generator = Arc::clone(&self.generator);

        let content = tokio::task::spawn_blocking(move || generator.generate(&payload))
            .await
            .map_err(|err| GenerationError::Interrupted(err.to_string()))??;

        if !self.config.minify() {
            return Ok(content);
        }

        let minifier = Arc::clone(&self.minifier);
        let filename = self.config.filename().to_string();
        let minified = tokio::task::spawn_blocking(move || minifier.minify(&filename, &content))
            .await
            .map_err(|err| GenerationError::Interrupted(err.to_string()))??;
        Ok(minified)
    }

    /// Write the worker to this cycle's filepath, replacing any previous one.
    pub async fn write_manifest(&self, content: &str) -> Result<PathBuf, PluginError> {
        let cycle = self.cycle.as_ref().ok_or(PluginError::NotConfigured)?;
        let target = &cycle.overrides.filepath;

        write::write_replacing(
            target,
            content,
            &cycle.derived.output_dir,
            self.config.force_delete(),
        )
        .await?;
        Ok(target.clone())
    }

    /// One full cycle: configure, generate, write.
    pub async fn run(&mut self, compilation: &mut Compilation) -> Result<PathBuf, PluginError> {
        self.configure(compilation)?;
        for warning in self.warnings() {
            compilation.warn(BuildWarning::new(PLUGIN_NAME, warning.to_string()));
        }

        let content = self.create_manifest().await?;
        let path = self.write_manifest(&content).await?;
        log!("precache"; "wrote {} ({} bytes)", path.display(), content.len());
        Ok(path)
    }
}

impl BuildPlugin for ServiceWorkerPlugin {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn after_emit<'a>(&'a mut self, compilation: &'a mut Compilation) -> HookFuture<'a> {
        Box::pin(async move {
            self.run(compilation).await?;
            Ok(())
        })
    }
}
