//! Lifecycle hook and the host that drives it.

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

use super::Compilation;

/// Error a hook reports back to the pipeline.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Future returned by [`BuildPlugin::after_emit`]; the pipeline awaits it
/// before starting anything else for this compilation.
pub type HookFuture<'a> = Pin<Box<dyn Future<Output = Result<(), HookError>> + Send + 'a>>;

/// A plugin that runs once all build outputs are finalized.
///
/// Called once per build cycle. Asset names and content hashes are stable by
/// the time this runs. Returning `Err` fails the build.
pub trait BuildPlugin: Send {
    /// Short name used in warnings and error reports.
    fn name(&self) -> &'static str;

    /// Handle the "assets finalized" event.
    fn after_emit<'a>(&'a mut self, compilation: &'a mut Compilation) -> HookFuture<'a>;
}

/// A hook failed and the build is aborted.
#[derive(Debug, Error)]
#[error("plugin `{plugin}` failed")]
pub struct BuildError {
    pub plugin: &'static str,
    #[source]
    pub source: HookError,
}

/// Minimal host: runs registered plugins sequentially for each compilation.
#[derive(Default)]
pub struct Pipeline {
    plugins: Vec<Box<dyn BuildPlugin>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin; hooks run in registration order.
    pub fn with_plugin(mut self, plugin: impl BuildPlugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Fire the "assets finalized" event for one compilation.
    ///
    /// Each hook is awaited before the next starts; the first failure stops
    /// the cycle and is returned.
    pub async fn emit(&mut self, compilation: &mut Compilation) -> Result<(), BuildError> {
        for plugin in &mut self.plugins {
            let name = plugin.name();
            crate::debug!("pipeline"; "after_emit: {}", name);
            plugin
                .after_emit(compilation)
                .await
                .map_err(|source| BuildError { plugin: name, source })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::BuildWarning;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        name: &'static str,
        calls: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    impl BuildPlugin for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn after_emit<'a>(&'a mut self, compilation: &'a mut Compilation) -> HookFuture<'a> {
            Box::pin(async move {
                self.calls.lock().unwrap().push(self.name);
                compilation.warn(BuildWarning::new(self.name, "seen"));
                if self.fail {
                    return Err("boom".into());
                }
                Ok(())
            })
        }
    }

    fn recorder(name: &'static str, calls: &Arc<Mutex<Vec<&'static str>>>, fail: bool) -> Recorder {
        Recorder {
            name,
            calls: Arc::clone(calls),
            fail,
        }
    }

    #[tokio::test]
    async fn test_hooks_run_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut pipeline = Pipeline::new()
            .with_plugin(recorder("first", &calls, false))
            .with_plugin(recorder("second", &calls, false));
        let mut compilation = Compilation::new("/out", "/");

        pipeline.emit(&mut compilation).await.unwrap();

        assert_eq!(*calls.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(compilation.warnings.len(), 2);
    }

    #[tokio::test]
    async fn test_first_failure_stops_the_cycle() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut pipeline = Pipeline::new()
            .with_plugin(recorder("broken", &calls, true))
            .with_plugin(recorder("never", &calls, false));
        let mut compilation = Compilation::new("/out", "/");

        let err = pipeline.emit(&mut compilation).await.unwrap_err();

        assert_eq!(err.plugin, "broken");
        assert_eq!(err.source.to_string(), "boom");
        assert_eq!(*calls.lock().unwrap(), vec!["broken"]);
    }
}
