//! `FeatureGates`: the public surface over state, filters and reloading

use std::fmt;
use std::sync::Arc;

use featuregates_core::{
    FilterMap, GateError, GateQuery, GateState, Gates, LoadHooks, OnLoaded, ReloadLogger, Result,
    TranslateMap,
};
use serde_json::Value;

use crate::reload::{OnReloadError, PushSource, ReloadController, ReloadPhase};
use crate::source::DocumentSource;

/// Resolved feature gates kept in sync with an optional push source
///
/// ```
/// use featuregates_engine::{FeatureGates, TranslateMap};
/// use serde_json::json;
///
/// let gates = FeatureGates::builder()
///     .translate_map(TranslateMap::new().rule("x", "a.b"))
///     .build()
///     .unwrap();
/// gates.set(json!({"a": {"b": 5}})).unwrap();
/// assert_eq!(gates.get("x").unwrap(), json!(5));
/// ```
pub struct FeatureGates {
    state: Arc<GateState>,
    reload: ReloadController,
}

impl FeatureGates {
    pub fn builder() -> FeatureGatesBuilder {
        FeatureGatesBuilder::default()
    }

    /// Load the construction-time gates, or subscribe to the source and
    /// resolve once the first document has been loaded
    pub async fn initialize(&self) -> Result<()> {
        self.reload.initialize().await
    }

    /// Recompute the resolved view from the current raw gates
    pub fn load(&self) -> Result<()> {
        self.state.load()
    }

    /// Fetch the document once from the source and load it
    pub async fn refresh(&self) -> Result<()> {
        self.reload.refresh().await
    }

    /// Read from the resolved view
    ///
    /// - `get("a.b")` / `get(GateQuery::key_or("a.b", default))`: one value
    /// - `get(GateQuery::filtered("k", params))`: one filtered value
    /// - `get(params)`: every key, each filtered
    /// - `get(())`: the whole view
    ///
    /// The result is an owned copy. Keys that resolve to nothing are `null`.
    pub fn get(&self, query: impl Into<GateQuery>) -> Result<Value> {
        self.state.get(query)
    }

    /// Translate `gates` and store the result as the resolved view
    pub fn set(&self, gates: Value) -> Result<()> {
        self.state.set(gates, true)
    }

    /// [`set`](Self::set) with translation made optional; untranslated
    /// gates are stored verbatim as already resolved
    pub fn set_with(&self, gates: Value, should_translate: bool) -> Result<()> {
        self.state.set(gates, should_translate)
    }

    /// Stop receiving source updates; the current view is kept
    pub fn unsubscribe(&self) -> bool {
        self.reload.unsubscribe()
    }

    pub fn phase(&self) -> ReloadPhase {
        self.reload.phase()
    }

    /// True once a pushed document has been loaded successfully
    pub fn is_ready(&self) -> bool {
        self.phase() == ReloadPhase::Ready
    }

    pub fn is_subscribed(&self) -> bool {
        self.reload.is_subscribed()
    }

    /// Copy of the raw gates the view was last computed from
    pub fn raw(&self) -> Gates {
        self.state.raw()
    }
}

impl fmt::Debug for FeatureGates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureGates")
            .field("state", &self.state)
            .field("reload", &self.reload)
            .finish()
    }
}

#[derive(Default)]
pub struct FeatureGatesBuilder {
    source: Option<Arc<dyn DocumentSource>>,
    path: Option<String>,
    gates: Gates,
    logger: Option<Arc<dyn ReloadLogger>>,
    log_on_reload: bool,
    on_loaded: Option<OnLoaded>,
    on_reload_error: Option<OnReloadError>,
    translate_map: TranslateMap,
    filter_map: FilterMap,
}

impl FeatureGatesBuilder {
    /// Push source to subscribe to; requires [`path`](Self::path)
    pub fn source(mut self, source: Arc<dyn DocumentSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Document path inside the source
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Raw gates used until (or instead of) a pushed document
    pub fn gates(mut self, gates: Gates) -> Self {
        self.gates = gates;
        self
    }

    pub fn logger(mut self, logger: Arc<dyn ReloadLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Hand `{message, received, translated}` to the logger on every load
    pub fn log_on_reload(mut self, enabled: bool) -> Self {
        self.log_on_reload = enabled;
        self
    }

    pub fn on_loaded<F>(mut self, callback: F) -> Self
    where
        F: Fn(Gates) + Send + Sync + 'static,
    {
        self.on_loaded = Some(Arc::new(callback));
        self
    }

    pub fn shared_on_loaded(mut self, callback: OnLoaded) -> Self {
        self.on_loaded = Some(callback);
        self
    }

    /// Receives failures of source deliveries after the first one
    pub fn on_reload_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&GateError) + Send + Sync + 'static,
    {
        self.on_reload_error = Some(Arc::new(callback));
        self
    }

    pub fn translate_map(mut self, translate_map: TranslateMap) -> Self {
        self.translate_map = translate_map;
        self
    }

    pub fn filter_map(mut self, filter_map: FilterMap) -> Self {
        self.filter_map = filter_map;
        self
    }

    /// Validate the options; nothing is subscribed or loaded yet
    pub fn build(self) -> Result<FeatureGates> {
        let push = match self.source {
            Some(source) => Some(PushSource::new(source, self.path.unwrap_or_default())?),
            None => None,
        };
        let hooks = LoadHooks {
            logger: self.logger,
            log_on_reload: self.log_on_reload,
            on_loaded: self.on_loaded,
        };
        let state = Arc::new(GateState::new(
            self.gates,
            self.translate_map,
            self.filter_map,
            hooks,
        )?);
        let reload = ReloadController::new(state.clone(), push, self.on_reload_error);
        Ok(FeatureGates { state, reload })
    }
}

impl fmt::Debug for FeatureGatesBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureGatesBuilder")
            .field("source", &self.source.is_some())
            .field("path", &self.path)
            .field("log_on_reload", &self.log_on_reload)
            .field("translate_map", &self.translate_map)
            .field("filter_map", &self.filter_map)
            .finish_non_exhaustive()
    }
}
