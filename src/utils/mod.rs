//! Shared helpers for the plugin and the built-in generator.

pub mod hash;
pub mod path;
pub mod url;
