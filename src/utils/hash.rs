//! Content hashing using blake3.
//!
//! Precache entries carry a revision string derived from file contents, so a
//! worker can tell which cached responses went stale between builds.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let rev = hash::revision(b"console.log(1)"); // -> "a1b2c3..." (32 hex chars)
//! let rev = hash::revision_reader(File::open(path)?)?;
//! ```

use std::io::{self, Read};

/// Number of hex characters kept from the full blake3 digest.
pub const REVISION_LEN: usize = 32;

/// Compute the revision string for in-memory bytes.
#[inline]
pub fn revision<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    let hash = blake3::hash(data.as_ref());
    truncate(hex::encode(hash.as_bytes()))
}

/// Compute the revision string from a reader (streaming, for large files).
pub fn revision_reader(mut reader: impl Read) -> io::Result<String> {
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 8192];
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(truncate(hex::encode(hasher.finalize().as_bytes())))
}

/// Incremental revision over several sources (dynamic URLs hash all their dependencies).
#[derive(Default)]
pub struct RevisionHasher(blake3::Hasher);

impl RevisionHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_reader(&mut self, mut reader: impl Read) -> io::Result<()> {
        let mut buffer = [0u8; 8192];
        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                return Ok(());
            }
            self.0.update(&buffer[..n]);
        }
    }

    pub fn finish(&self) -> String {
        truncate(hex::encode(self.0.finalize().as_bytes()))
    }
}

#[inline]
fn truncate(mut hex: String) -> String {
    hex.truncate(REVISION_LEN);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_is_stable() {
        let a = revision("body { color: red; }");
        let b = revision("body { color: red; }");
        assert_eq!(a, b);
        assert_eq!(a.len(), REVISION_LEN);
    }

    #[test]
    fn test_revision_changes_with_content() {
        assert_ne!(revision("console.log(1)"), revision("console.log(2)"));
    }

    #[test]
    fn test_reader_matches_slice() {
        let data = vec![7u8; 20_000];
        let streamed = revision_reader(data.as_slice()).unwrap();
        assert_eq!(streamed, revision(&data));
    }

    #[test]
    fn test_incremental_matches_concatenation() {
        let mut hasher = RevisionHasher::new();
        hasher.update_reader(&b"hello "[..]).unwrap();
        hasher.update_reader(&b"world"[..]).unwrap();
        assert_eq!(hasher.finish(), revision("hello world"));
    }
}
