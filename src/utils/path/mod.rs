//! Path utilities.
//!
//! - [`fs`]: normalization (`normalize_path`, `normalize_lexical`) and
//!   string conversions used when paths become manifest entries.

pub mod fs;

pub use fs::{
    absolute_lexical, dir_prefix, join_normalized, normalize_lexical, normalize_path, path_to_string,
};
