//! Host build-pipeline contract.
//!
//! The bundler side of the integration: what a compilation looks like once
//! its assets are finalized, the hook trait plugins implement, and a minimal
//! host that runs hooks in order and fails the build on the first error.
//!
//! ```text
//! Compilation (assets final) ──► Pipeline::emit ──► plugin.after_emit().await
//!                                      │                    │
//!                                      └── BuildError ◄─────┘ (first failure)
//! ```

mod compilation;
mod hook;
mod stats;

pub use compilation::{BuildWarning, Chunk, Compilation};
pub use hook::{BuildError, BuildPlugin, HookError, HookFuture, Pipeline};
pub use stats::StatsError;
