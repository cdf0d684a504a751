//! Declarative gates configuration
//!
//! Everything except code can be described in TOML:
//!
//! ```toml
//! path = "gates.json"
//! log_on_reload = true
//! logger = "tracing"
//! on_loaded = "announce"
//!
//! [translate]
//! testValues = "test.testers.hi"
//! total = { path = "stats.count", default = 0, transformer = "double" }
//!
//! [filters]
//! workspaceFilters = "by_workspace"
//! ```
//!
//! Transformers, filters, on-loaded hooks and custom loggers are referenced
//! by name and looked up in a [`Registry`] supplied by the program.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use featuregates_core::{
    FilterFn, FilterMap, FilterParams, GateError, Gates, OnLoaded, ReloadLogger, Result, Rule,
    StdoutLogger, TracingLogger, Transformer, TranslateMap,
};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::gates::FeatureGatesBuilder;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatesConfig {
    /// Document path inside the push source
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub log_on_reload: bool,
    /// Registered logger name (`tracing` and `stdout` are built in)
    #[serde(default)]
    pub logger: Option<String>,
    /// Registered hook name
    #[serde(default)]
    pub on_loaded: Option<String>,
    #[serde(default)]
    pub translate: IndexMap<String, RuleConfig>,
    /// Output key -> registered filter name
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RuleConfig {
    Path(String),
    Detailed(DetailedRule),
}

/// `{ path, default, transformer }` form of a translate rule
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetailedRule {
    pub path: String,
    #[serde(default)]
    pub default: Option<Value>,
    /// Registered transformer name
    #[serde(default)]
    pub transformer: Option<String>,
}

impl GatesConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| GateError::Config {
            message: err.to_string(),
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| GateError::Config {
            message: format!("cannot read {}: {err}", path.display()),
        })?;
        Self::from_toml_str(&text)
    }

    pub fn translate_map(&self, registry: &Registry) -> Result<TranslateMap> {
        self.translate
            .iter()
            .map(|(key, rule)| -> Result<(String, Rule)> {
                let rule = match rule {
                    RuleConfig::Path(path) => Rule::path(path.as_str()),
                    RuleConfig::Detailed(DetailedRule {
                        path,
                        default,
                        transformer,
                    }) => {
                        let mut rule = Rule::path(path.as_str());
                        if let Some(default) = default {
                            rule = rule.with_default(default.clone());
                        }
                        if let Some(name) = transformer {
                            let transformer = registry.transformer(name).ok_or_else(|| {
                                GateError::UnknownTransformer {
                                    key: key.clone(),
                                    name: name.clone(),
                                }
                            })?;
                            rule = rule.with_shared_transformer(transformer);
                        }
                        rule
                    }
                };
                Ok((key.clone(), rule))
            })
            .collect()
    }

    pub fn filter_map(&self, registry: &Registry) -> Result<FilterMap> {
        let mut filters = FilterMap::new();
        for (key, name) in &self.filters {
            let filter = registry
                .filter(name)
                .ok_or_else(|| GateError::UnknownFilter {
                    key: key.clone(),
                    name: name.clone(),
                })?;
            filters.insert(key.clone(), filter);
        }
        Ok(filters)
    }

    /// Apply every option to `builder`, resolving names through `registry`
    pub fn configure(
        &self,
        builder: FeatureGatesBuilder,
        registry: &Registry,
    ) -> Result<FeatureGatesBuilder> {
        let mut builder = builder
            .log_on_reload(self.log_on_reload)
            .translate_map(self.translate_map(registry)?)
            .filter_map(self.filter_map(registry)?);
        if let Some(path) = &self.path {
            builder = builder.path(path.clone());
        }
        if let Some(name) = &self.logger {
            let logger = registry
                .logger(name)
                .ok_or_else(|| GateError::InvalidLogger { name: name.clone() })?;
            builder = builder.logger(logger);
        }
        if let Some(name) = &self.on_loaded {
            let hook = registry
                .hook(name)
                .ok_or_else(|| GateError::InvalidCallback { name: name.clone() })?;
            builder = builder.shared_on_loaded(hook);
        }
        Ok(builder)
    }
}

/// Named code referenced from a [`GatesConfig`]
#[derive(Clone)]
pub struct Registry {
    transformers: HashMap<String, Transformer>,
    filters: HashMap<String, FilterFn>,
    hooks: HashMap<String, OnLoaded>,
    loggers: HashMap<String, Arc<dyn ReloadLogger>>,
}

impl Registry {
    /// Registry holding only the built-in `tracing` and `stdout` loggers
    pub fn new() -> Self {
        let mut loggers: HashMap<String, Arc<dyn ReloadLogger>> = HashMap::new();
        loggers.insert("tracing".to_string(), Arc::new(TracingLogger));
        loggers.insert("stdout".to_string(), Arc::new(StdoutLogger));
        Self {
            transformers: HashMap::new(),
            filters: HashMap::new(),
            hooks: HashMap::new(),
            loggers,
        }
    }

    pub fn with_transformer<F>(mut self, name: impl Into<String>, transformer: F) -> Self
    where
        F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.transformers.insert(name.into(), Arc::new(transformer));
        self
    }

    pub fn with_filter<F>(mut self, name: impl Into<String>, filter: F) -> Self
    where
        F: Fn(&Value, &FilterParams) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
        self
    }

    pub fn with_hook<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(Gates) + Send + Sync + 'static,
    {
        self.hooks.insert(name.into(), Arc::new(hook));
        self
    }

    pub fn with_logger(mut self, name: impl Into<String>, logger: Arc<dyn ReloadLogger>) -> Self {
        self.loggers.insert(name.into(), logger);
        self
    }

    pub fn transformer(&self, name: &str) -> Option<Transformer> {
        self.transformers.get(name).cloned()
    }

    pub fn filter(&self, name: &str) -> Option<FilterFn> {
        self.filters.get(name).cloned()
    }

    pub fn hook(&self, name: &str) -> Option<OnLoaded> {
        self.hooks.get(name).cloned()
    }

    pub fn logger(&self, name: &str) -> Option<Arc<dyn ReloadLogger>> {
        self.loggers.get(name).cloned()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn names<T>(map: &HashMap<String, T>) -> Vec<&str> {
            let mut names: Vec<_> = map.keys().map(String::as_str).collect();
            names.sort_unstable();
            names
        }
        f.debug_struct("Registry")
            .field("transformers", &names(&self.transformers))
            .field("filters", &names(&self.filters))
            .field("hooks", &names(&self.hooks))
            .field("loggers", &names(&self.loggers))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = r#"
path = "gates.json"
log_on_reload = true
logger = "tracing"

[translate]
testValues = "test.testers.hi"
total = { path = "stats.count", default = 0, transformer = "double" }

[filters]
scoped = "by_workspace"
"#;

    fn registry() -> Registry {
        Registry::new()
            .with_transformer("double", |v| Ok(json!(v.as_i64().unwrap_or(0) * 2)))
            .with_filter("by_workspace", |v, _| Ok(v.clone()))
    }

    #[test]
    fn test_parse_sample() {
        let config = GatesConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.path.as_deref(), Some("gates.json"));
        assert!(config.log_on_reload);
        assert_eq!(
            config.translate.get("testValues"),
            Some(&RuleConfig::Path("test.testers.hi".to_string()))
        );
        assert_eq!(
            config.translate.get("total"),
            Some(&RuleConfig::Detailed(DetailedRule {
                path: "stats.count".to_string(),
                default: Some(json!(0)),
                transformer: Some("double".to_string()),
            }))
        );
        let keys: Vec<_> = config.translate.keys().cloned().collect();
        assert_eq!(keys, vec!["testValues".to_string(), "total".to_string()]);
    }

    #[test]
    fn test_translate_map_resolves_transformer() {
        let config = GatesConfig::from_toml_str(SAMPLE).unwrap();
        let map = config.translate_map(&registry()).unwrap();
        let rule = map.get("total").unwrap();
        assert_eq!(rule.source_path(), "stats.count");
        assert_eq!(rule.default_value(), Some(&json!(0)));
        assert!(rule.has_transformer());
    }

    #[test]
    fn test_unknown_transformer_rejected() {
        let config = GatesConfig::from_toml_str(SAMPLE).unwrap();
        let err = config.translate_map(&Registry::new()).unwrap_err();
        assert_eq!(
            err,
            GateError::UnknownTransformer {
                key: "total".to_string(),
                name: "double".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_filter_rejected() {
        let config = GatesConfig::from_toml_str(SAMPLE).unwrap();
        let err = config
            .filter_map(&Registry::new().with_transformer("double", Ok))
            .unwrap_err();
        assert!(matches!(err, GateError::UnknownFilter { ref name, .. } if name == "by_workspace"));
    }

    #[test]
    fn test_unknown_field_is_config_error() {
        let err = GatesConfig::from_toml_str("pth = \"typo\"").unwrap_err();
        assert!(matches!(err, GateError::Config { .. }));
    }

    #[test]
    fn test_misspelled_rule_field_is_config_error() {
        for text in [
            "[translate]\ntotal = { path = \"a.b\", defualt = 0 }",
            "[translate]\ntotal = { path = \"a.b\", transfomer = \"double\" }",
        ] {
            let err = GatesConfig::from_toml_str(text).unwrap_err();
            assert!(matches!(err, GateError::Config { .. }), "{text}: {err:?}");
        }
    }
}
