//! Precache service worker plugin for bundler pipelines.
//!
//! After a build finalizes its assets, [`ServiceWorkerPlugin`] derives the
//! list of files to precache, maps them to public URLs, resolves hashed
//! `importScripts`, renders a service worker and writes it next to the
//! build output.
//!
//! ```ignore
//! use precache_plugin::{PluginConfig, PluginOptions, ServiceWorkerPlugin};
//! use precache_plugin::pipeline::{Compilation, Pipeline};
//!
//! let config = PluginConfig::new(PluginOptions::from_path("precache.toml".as_ref())?)?;
//! let mut pipeline = Pipeline::new().with_plugin(ServiceWorkerPlugin::new(config));
//!
//! let mut compilation = Compilation::from_stats_path("dist/stats.json".as_ref())?;
//! pipeline.emit(&mut compilation).await?;
//! ```

pub mod cli;
pub mod config;
pub mod generator;
pub mod logger;
pub mod minify;
pub mod pipeline;
pub mod plugin;
pub mod utils;

pub use config::{ImportScript, PluginConfig, PluginOptions};
pub use generator::{GenerationError, ManifestGenerator, PrecacheGenerator};
pub use minify::{MinificationError, Minifier, OxcMinifier};
pub use plugin::{ConfigurationWarning, PluginError, ServiceWorkerPlugin, WriteError};
