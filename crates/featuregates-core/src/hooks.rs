//! Load-time side effects: reload logging and the on-loaded callback

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::errors::{GateError, Result};
use crate::Gates;

/// Sink for the structured record emitted after each load
pub trait ReloadLogger: Send + Sync {
    fn info(&self, record: &Value);
}

/// Forwards reload records to `tracing` at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl ReloadLogger for TracingLogger {
    fn info(&self, record: &Value) {
        tracing::info!(target: "featuregates::reload", record = %record, "feature gates loaded");
    }
}

/// Writes each reload record as one JSON line on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutLogger;

impl ReloadLogger for StdoutLogger {
    fn info(&self, record: &Value) {
        println!("{record}");
    }
}

/// Callback receiving a copy of the resolved view after each load
pub type OnLoaded = Arc<dyn Fn(Gates) + Send + Sync>;

/// Side effects run by `GateState::load` once the view has been swapped in
#[derive(Clone, Default)]
pub struct LoadHooks {
    pub logger: Option<Arc<dyn ReloadLogger>>,
    pub log_on_reload: bool,
    pub on_loaded: Option<OnLoaded>,
}

impl LoadHooks {
    /// Reject combinations that cannot work at runtime
    pub fn validate(&self) -> Result<()> {
        if self.log_on_reload && self.logger.is_none() {
            return Err(GateError::MissingLogger);
        }
        Ok(())
    }

    pub(crate) fn after_load(&self, raw: &Gates, resolved: &Gates) {
        if self.log_on_reload {
            if let Some(logger) = &self.logger {
                logger.info(&reload_record(raw, resolved));
            }
        }
        if let Some(on_loaded) = &self.on_loaded {
            schedule(on_loaded.clone(), resolved.clone());
        }
    }
}

impl fmt::Debug for LoadHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadHooks")
            .field("logger", &self.logger.is_some())
            .field("log_on_reload", &self.log_on_reload)
            .field("on_loaded", &self.on_loaded.is_some())
            .finish()
    }
}

/// Record handed to the reload logger
pub fn reload_record(raw: &Gates, resolved: &Gates) -> Value {
    json!({
        "message": featuregates_core_types::schema::RELOAD_MESSAGE,
        "received": raw,
        "translated": resolved,
    })
}

/// Run `callback` after the current synchronous work, never inline
///
/// Inside a tokio runtime the callback becomes a task on that runtime;
/// outside one it runs on a detached thread.
pub fn schedule(callback: OnLoaded, view: Gates) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move { callback(view) });
        }
        Err(_) => {
            std::thread::spawn(move || callback(view));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_log_on_reload_requires_logger() {
        let hooks = LoadHooks {
            log_on_reload: true,
            ..LoadHooks::default()
        };
        assert_eq!(hooks.validate(), Err(GateError::MissingLogger));

        let hooks = LoadHooks {
            log_on_reload: true,
            logger: Some(Arc::new(TracingLogger)),
            ..LoadHooks::default()
        };
        assert!(hooks.validate().is_ok());
    }

    #[test]
    fn test_reload_record_shape() {
        let mut raw = Gates::new();
        raw.insert("a".to_string(), json!({"b": 1}));
        let mut resolved = Gates::new();
        resolved.insert("x".to_string(), json!(1));

        let record = reload_record(&raw, &resolved);
        assert_eq!(record["message"], json!("Feature gates loaded"));
        assert_eq!(record["received"], json!({"a": {"b": 1}}));
        assert_eq!(record["translated"], json!({"x": 1}));
    }

    #[test]
    fn test_schedule_without_runtime_runs_on_thread() {
        let (tx, rx) = mpsc::channel();
        let caller = std::thread::current().id();
        let callback: OnLoaded = Arc::new(move |view| {
            tx.send((std::thread::current().id(), view.len())).ok();
        });

        schedule(callback, Gates::new());

        let (thread, len) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_ne!(thread, caller);
        assert_eq!(len, 0);
    }
}
