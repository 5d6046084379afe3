//! Loading a compilation from a bundler stats document.
//!
//! Accepts the subset of webpack's `stats.json` the plugin needs:
//!
//! ```json
//! {
//!   "hash": "4e1f0c2b",
//!   "outputPath": "/app/dist",
//!   "publicPath": "/assets/",
//!   "assets": [{ "name": "main.4e1f.js" }, "index.html"],
//!   "chunks": [{ "names": ["main"], "files": ["main.4e1f.js"], "hash": "4e1f" }]
//! }
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{Chunk, Compilation};

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("stats parsing error")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Stats {
    #[serde(default)]
    hash: String,
    #[serde(default)]
    output_path: Option<PathBuf>,
    #[serde(default)]
    public_path: Option<String>,
    #[serde(default)]
    assets: Vec<StatsAsset>,
    #[serde(default)]
    chunks: Vec<StatsChunk>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatsAsset {
    Name(String),
    Object { name: String },
}

#[derive(Deserialize)]
struct StatsChunk {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    files: Vec<String>,
    #[serde(default)]
    hash: String,
}

impl Compilation {
    /// Parse stats JSON. A relative `outputPath` is resolved against `base_dir`;
    /// a missing one means `base_dir` itself.
    pub fn from_stats_json(content: &str, base_dir: &Path) -> Result<Self, StatsError> {
        let stats: Stats = serde_json::from_str(content)?;

        let output_path = match stats.output_path {
            Some(path) if path.is_absolute() => path,
            Some(path) => base_dir.join(path),
            None => base_dir.to_path_buf(),
        };

        let assets = stats
            .assets
            .into_iter()
            .map(|asset| match asset {
                StatsAsset::Name(name) | StatsAsset::Object { name } => name,
            })
            .collect();

        let chunks = stats
            .chunks
            .into_iter()
            .map(|chunk| Chunk {
                name: chunk.name.or_else(|| chunk.names.into_iter().next()),
                files: chunk.files,
                hash: chunk.hash,
            })
            .collect();

        Ok(Self {
            hash: stats.hash,
            assets,
            chunks,
            output_path,
            public_path: stats.public_path.unwrap_or_default(),
            warnings: Vec::new(),
        })
    }

    /// Read and parse a stats file.
    pub fn from_stats_path(path: &Path) -> Result<Self, StatsError> {
        let content =
            fs::read_to_string(path).map_err(|err| StatsError::Io(path.to_path_buf(), err))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_stats_json(&content, base_dir)
    }
}
