//! Command-line interface module.

mod args;
pub mod build;
mod debouncer;
pub mod watch;

pub use args::{BuildArgs, Cli, Commands};
