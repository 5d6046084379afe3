//! `importScripts` resolution.
//!
//! Each entry becomes a file name (chunk references are looked up in the
//! compilation), gets hash placeholders substituted, and is resolved against
//! the public path. Output order matches input order.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::config::{ConfigError, ImportScript};
use crate::pipeline::Compilation;
use crate::utils::url;

/// `[hash]`, `[hash:8]`, `[chunkhash]`, `[chunkhash:8]`
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(hash|chunkhash)(?::(\d+))?\]").unwrap());

/// Resolve every import script to a URL for this build.
pub fn resolve_all(
    scripts: &[ImportScript],
    compilation: &Compilation,
) -> Result<Vec<String>, ConfigError> {
    scripts
        .iter()
        .map(|script| resolve(script, compilation))
        .collect()
}

fn resolve(script: &ImportScript, compilation: &Compilation) -> Result<String, ConfigError> {
    let (name, chunk_hash) = match script {
        ImportScript::Literal(name) | ImportScript::HashedLiteral(name) => {
            (name.as_str(), compilation.hash.as_str())
        }
        ImportScript::ChunkReference(chunk_name) => {
            let chunk = compilation
                .chunk(chunk_name)
                .ok_or_else(|| ConfigError::UnknownChunk(chunk_name.clone()))?;
            let file = chunk
                .script_file()
                .ok_or_else(|| ConfigError::EmptyChunk(chunk_name.clone()))?;
            (file, chunk.hash.as_str())
        }
    };

    let name = substitute(name, &compilation.hash, chunk_hash);
    Ok(url::resolve(&compilation.public_path, &name))
}

/// Replace hash placeholders; `:N` keeps the first N characters.
pub fn substitute(name: &str, build_hash: &str, chunk_hash: &str) -> String {
    PLACEHOLDER
        .replace_all(name, |caps: &Captures<'_>| {
            let hash = match &caps[1] {
                "hash" => build_hash,
                _ => chunk_hash,
            };
            match caps.get(2).and_then(|len| len.as_str().parse::<usize>().ok()) {
                Some(len) => hash.chars().take(len).collect(),
                None => hash.to_string(),
            }
        })
        .into_owned()
}
