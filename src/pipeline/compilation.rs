//! Finalized compilation as seen by plugins.

use std::fmt;
use std::path::PathBuf;

/// One build cycle's output, handed to plugins after every asset is written.
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    /// Build-wide content hash, substituted for `[hash]`.
    pub hash: String,
    /// Emitted asset names relative to `output_path`, in emission order.
    pub assets: Vec<String>,
    /// Chunk metadata.
    pub chunks: Vec<Chunk>,
    /// Configured output directory.
    pub output_path: PathBuf,
    /// Configured public URL prefix (may be empty).
    pub public_path: String,
    /// Non-fatal diagnostics collected during the cycle.
    pub warnings: Vec<BuildWarning>,
}

impl Compilation {
    pub fn new(output_path: impl Into<PathBuf>, public_path: impl Into<String>) -> Self {
        Self {
            output_path: output_path.into(),
            public_path: public_path.into(),
            ..Self::default()
        }
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = hash.into();
        self
    }

    pub fn with_assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assets = assets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_chunk(mut self, chunk: Chunk) -> Self {
        self.chunks.push(chunk);
        self
    }

    /// Look up a named chunk.
    pub fn chunk(&self, name: &str) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.name.as_deref() == Some(name))
    }

    /// Push a warning onto the build's warning channel.
    pub fn warn(&mut self, warning: BuildWarning) {
        self.warnings.push(warning);
    }
}

/// A named build-output unit and the files it emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    pub name: Option<String>,
    pub files: Vec<String>,
    /// Chunk content hash, substituted for `[chunkhash]`.
    pub hash: String,
}

impl Chunk {
    pub fn new<I, S>(name: impl Into<String>, files: I, hash: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: Some(name.into()),
            files: files.into_iter().map(Into::into).collect(),
            hash: hash.into(),
        }
    }

    /// The file a script reference should point at.
    ///
    /// Prefers the first `.js` file, since chunks may also emit styles and
    /// source maps.
    pub fn script_file(&self) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.ends_with(".js"))
            .or_else(|| self.files.first())
            .map(String::as_str)
    }
}

/// Non-fatal diagnostic attached to a compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildWarning {
    /// Plugin or subsystem that raised it.
    pub origin: &'static str,
    pub message: String,
}

impl BuildWarning {
    pub fn new(origin: &'static str, message: impl Into<String>) -> Self {
        Self {
            origin,
            message: message.into(),
        }
    }
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.origin, self.message)
    }
}
