//! Reload state machine
//!
//! ```text
//! Uninitialized --initialize()--> Initializing --first good update--> Ready
//!                                                   Ready --update--> Ready
//! ```
//!
//! Without a push source (or once this instance is subscribed or ready)
//! `initialize` is a plain synchronous load. With one, the first call
//! subscribes and waits for the first delivered document; every later
//! delivery stores the new raw gates and reloads. Only the first delivery
//! settles the pending `initialize`. Failures on later deliveries are
//! logged and handed to the `on_reload_error` callback; the previous view
//! stays in place.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use featuregates_core::{into_gates, log_op_end, log_op_error, log_op_start};
use featuregates_core::{GateError, GateState, Result};
use featuregates_core_types::schema::{OP_INITIALIZE, OP_RELOAD, OP_REFRESH};
use serde_json::Value;
use tokio::sync::oneshot;

use crate::source::{DocumentSource, Subscription, UpdateHandler};

/// Callback for failures on deliveries after the first one
pub type OnReloadError = Arc<dyn Fn(&GateError) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadPhase {
    Uninitialized,
    Initializing,
    Ready,
}

/// Push source plus the document path it is subscribed at
#[derive(Clone)]
pub struct PushSource {
    source: Arc<dyn DocumentSource>,
    path: String,
}

impl PushSource {
    /// Fails with `InvalidPath` when `path` is empty or blank
    pub fn new(source: Arc<dyn DocumentSource>, path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(GateError::InvalidPath {
                reason: "a document path is required when a source is configured".to_string(),
            });
        }
        Ok(Self { source, path })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Debug for PushSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushSource")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

pub struct ReloadController {
    state: Arc<GateState>,
    push: Option<PushSource>,
    phase: Arc<Mutex<ReloadPhase>>,
    on_reload_error: Option<OnReloadError>,
    subscription: Mutex<Option<Subscription>>,
}

impl ReloadController {
    pub fn new(
        state: Arc<GateState>,
        push: Option<PushSource>,
        on_reload_error: Option<OnReloadError>,
    ) -> Self {
        Self {
            state,
            push,
            phase: Arc::new(Mutex::new(ReloadPhase::Uninitialized)),
            on_reload_error,
            subscription: Mutex::new(None),
        }
    }

    pub fn phase(&self) -> ReloadPhase {
        *lock(&self.phase)
    }

    pub fn is_subscribed(&self) -> bool {
        lock(&self.subscription).is_some()
    }

    /// Load once, or subscribe and wait for the first delivered document
    pub async fn initialize(&self) -> Result<()> {
        let Some(push) = &self.push else {
            return self.state.load();
        };

        let started = Instant::now();
        let first_update = {
            let mut slot = lock(&self.subscription);
            if slot.is_some() || self.phase() == ReloadPhase::Ready {
                drop(slot);
                return self.state.load();
            }

            log_op_start!(OP_INITIALIZE, source_path = push.path());
            let (tx, rx) = oneshot::channel();
            *lock(&self.phase) = ReloadPhase::Initializing;
            match push.source.subscribe(&push.path, self.update_handler(push, tx)) {
                Ok(subscription) => *slot = Some(subscription),
                Err(err) => {
                    *lock(&self.phase) = ReloadPhase::Uninitialized;
                    log_op_error!(OP_INITIALIZE, err, duration_ms = elapsed_ms(started));
                    return Err(err);
                }
            }
            rx
        };

        let outcome = first_update
            .await
            .unwrap_or_else(|_| {
                Err(GateError::SubscriptionClosed {
                    path: push.path.clone(),
                })
            });
        match &outcome {
            Ok(()) => {
                log_op_end!(OP_INITIALIZE, duration_ms = elapsed_ms(started));
            }
            Err(err) => {
                log_op_error!(OP_INITIALIZE, err, duration_ms = elapsed_ms(started));
            }
        }
        outcome
    }

    /// Fetch the document once and load it; without a source, just load
    pub async fn refresh(&self) -> Result<()> {
        let Some(push) = &self.push else {
            return self.state.load();
        };

        let started = Instant::now();
        log_op_start!(OP_REFRESH, source_path = push.path());
        let outcome = match push.source.fetch_once(&push.path).await.and_then(into_gates) {
            Ok(raw) => {
                self.state.replace_raw(raw);
                self.state.load()
            }
            Err(err) => Err(err),
        };
        match &outcome {
            Ok(()) => {
                log_op_end!(OP_REFRESH, duration_ms = elapsed_ms(started));
            }
            Err(err) => {
                log_op_error!(OP_REFRESH, err, duration_ms = elapsed_ms(started));
            }
        }
        outcome
    }

    /// Stop receiving updates; returns false when nothing was subscribed
    ///
    /// The current view is kept. A later `initialize` subscribes again
    /// unless the first document had already been loaded.
    pub fn unsubscribe(&self) -> bool {
        let released = lock(&self.subscription).take();
        let mut phase = lock(&self.phase);
        if *phase == ReloadPhase::Initializing {
            *phase = ReloadPhase::Uninitialized;
        }
        released.is_some()
    }

    fn update_handler(
        &self,
        push: &PushSource,
        first_update: oneshot::Sender<Result<()>>,
    ) -> UpdateHandler {
        let state = self.state.clone();
        let phase = self.phase.clone();
        let on_reload_error = self.on_reload_error.clone();
        let path = push.path.clone();
        let pending = Mutex::new(Some(first_update));

        Arc::new(move |update: Result<Value>| {
            let started = Instant::now();
            log_op_start!(OP_RELOAD, source_path = path.as_str());

            let outcome = update.and_then(into_gates).and_then(|raw| {
                state.replace_raw(raw);
                state.load()
            });

            match &outcome {
                Ok(()) => {
                    *lock(&phase) = ReloadPhase::Ready;
                    log_op_end!(OP_RELOAD, duration_ms = elapsed_ms(started));
                }
                Err(err) => {
                    log_op_error!(OP_RELOAD, err, duration_ms = elapsed_ms(started));
                }
            }

            match (lock(&pending).take(), outcome) {
                (Some(tx), outcome) => {
                    // initialize() may have been dropped; nobody to tell then
                    let _ = tx.send(outcome);
                }
                (None, Err(err)) => {
                    if let Some(callback) = &on_reload_error {
                        callback(&err);
                    }
                }
                (None, Ok(())) => {}
            }
        })
    }
}

impl fmt::Debug for ReloadController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadController")
            .field("push", &self.push)
            .field("phase", &self.phase())
            .field("subscribed", &self.is_subscribed())
            .finish()
    }
}
