//! `watch` command: rebuild the worker whenever the stats file changes.
//!
//! ```text
//! notify (thread) → mpsc → Debouncer → run_cycle → WatchStatus
//! ```
//!
//! Cycles never overlap: the loop awaits each one before reading more events.

use anyhow::{Context, Result};
use notify::{RecursiveMode, Watcher};

use super::build::{load_config, pipeline, run_cycle};
use super::debouncer::Debouncer;
use super::{BuildArgs, Cli};
use crate::log;
use crate::logger;
use crate::pipeline::Pipeline;
use crate::utils::path::normalize_path;

/// Entry point for `precache watch`.
pub async fn watch(cli: &Cli, args: &BuildArgs) -> Result<()> {
    let config = load_config(cli, args)?;
    let mut pipeline = pipeline(config);

    let stats = normalize_path(&args.stats);
    let watch_dir = stats
        .parent()
        .map(ToOwned::to_owned)
        .context("stats file has no parent directory")?;

    // Watcher first, so changes during the initial cycle are buffered
    let (notify_tx, notify_rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = notify_tx.send(res);
    })
    .context("failed to create file watcher")?;
    watcher
        .watch(&watch_dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", watch_dir.display()))?;

    let (async_tx, mut async_rx) = tokio::sync::mpsc::channel::<notify::Event>(64);
    std::thread::spawn(move || {
        while let Ok(result) = notify_rx.recv() {
            match result {
                Ok(event) => {
                    if async_tx.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(e) => log!("watch"; "notify error: {}", e),
            }
        }
    });

    log!("watch"; "watching {}", stats.display());
    cycle(&mut pipeline, args).await;

    let mut debouncer = Debouncer::new(stats);
    loop {
        tokio::select! {
            biased;
            event = async_rx.recv() => match event {
                Some(event) => debouncer.add_event(&event),
                None => break,
            },
            _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                if debouncer.take_if_ready() {
                    cycle(&mut pipeline, args).await;
                }
            }
        }
    }

    drop(watcher);
    Ok(())
}

/// Run one cycle and report it on the status line. Failures don't stop watching.
async fn cycle(pipeline: &mut Pipeline, args: &BuildArgs) {
    match run_cycle(pipeline, args).await {
        Ok(warnings) if warnings.is_empty() => logger::status_success("service worker updated"),
        Ok(warnings) => logger::status_warning(&warnings.join("\n")),
        Err(e) => logger::status_error("build failed", &format!("{e:#}")),
    }
}
