//! `importScripts` entries.
//!
//! Accepted shapes:
//!
//! ```toml
//! importScripts = [
//!     "sw-extra.js",                      # Literal
//!     { filename = "sw-ext.[hash].js" },  # HashedLiteral
//!     { chunkName = "sw-runtime" },       # ChunkReference
//! ]
//! ```

use serde::{Deserialize, Serialize};

/// A script the generated worker pulls in with `importScripts(...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawImportScript", into = "RawImportScript")]
pub enum ImportScript {
    /// Plain file name, used as written.
    Literal(String),
    /// File name template that may carry `[hash]` placeholders.
    HashedLiteral(String),
    /// Named build-output chunk; its emitted file name is looked up per build.
    ChunkReference(String),
}

impl ImportScript {
    pub fn literal(name: impl Into<String>) -> Self {
        Self::Literal(name.into())
    }

    pub fn hashed(template: impl Into<String>) -> Self {
        Self::HashedLiteral(template.into())
    }

    pub fn chunk(name: impl Into<String>) -> Self {
        Self::ChunkReference(name.into())
    }
}

/// Serialized form, distinguished by shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawImportScript {
    Name(String),
    #[serde(rename_all = "camelCase")]
    Chunk { chunk_name: String },
    Filename { filename: String },
}

impl From<RawImportScript> for ImportScript {
    fn from(raw: RawImportScript) -> Self {
        match raw {
            RawImportScript::Name(name) => Self::Literal(name),
            RawImportScript::Filename { filename } => Self::HashedLiteral(filename),
            RawImportScript::Chunk { chunk_name } => Self::ChunkReference(chunk_name),
        }
    }
}

impl From<ImportScript> for RawImportScript {
    fn from(script: ImportScript) -> Self {
        match script {
            ImportScript::Literal(name) => Self::Name(name),
            ImportScript::HashedLiteral(filename) => Self::Filename { filename },
            ImportScript::ChunkReference(chunk_name) => Self::Chunk { chunk_name },
        }
    }
}
