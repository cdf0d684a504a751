//! Declarative translation of raw gates into the resolved view
//!
//! A [`TranslateMap`] maps every output key to a [`Rule`]: a source path,
//! an optional default used when that path is absent, and an optional
//! transformer applied to the (post-default) value. An empty map is the
//! identity translation.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::errors::{GateError, Result};
use crate::path;
use crate::Gates;

/// Transformer applied to a resolved value before it is stored
pub type Transformer = Arc<dyn Fn(Value) -> anyhow::Result<Value> + Send + Sync>;

/// How a single output key is produced from the raw gates
#[derive(Clone)]
pub struct Rule {
    path: String,
    default_value: Option<Value>,
    transformer: Option<Transformer>,
}

impl Rule {
    /// Rule that copies the value found at `path`
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            default_value: None,
            transformer: None,
        }
    }

    /// Value used when `path` is absent from the raw gates
    pub fn with_default(mut self, default_value: Value) -> Self {
        self.default_value = Some(default_value);
        self
    }

    pub fn with_transformer<F>(mut self, transformer: F) -> Self
    where
        F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.transformer = Some(Arc::new(transformer));
        self
    }

    /// Attach an already shared transformer (e.g. one looked up by name)
    pub fn with_shared_transformer(mut self, transformer: Transformer) -> Self {
        self.transformer = Some(transformer);
        self
    }

    pub fn source_path(&self) -> &str {
        &self.path
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn has_transformer(&self) -> bool {
        self.transformer.is_some()
    }

    /// Produce the value for `key` from `raw`
    fn apply(&self, key: &str, raw: &Gates) -> Result<Value> {
        let value = path::resolve_or(raw, &self.path, self.default_value.clone())
            .unwrap_or(Value::Null);
        match &self.transformer {
            Some(transformer) => transformer(value).map_err(|err| GateError::Transform {
                key: key.to_string(),
                message: format!("{err:#}"),
            }),
            None => Ok(value),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("path", &self.path)
            .field("default_value", &self.default_value)
            .field("transformer", &self.transformer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl From<&str> for Rule {
    fn from(path: &str) -> Self {
        Rule::path(path)
    }
}

impl From<String> for Rule {
    fn from(path: String) -> Self {
        Rule::path(path)
    }
}

/// Ordered mapping from output key to rule
///
/// Iteration follows declaration order. Declaring a key twice replaces the
/// earlier rule in place, so the later declaration wins.
#[derive(Clone, Debug, Default)]
pub struct TranslateMap {
    rules: IndexMap<String, Rule>,
}

impl TranslateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn rule(mut self, key: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.insert(key, rule);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, rule: impl Into<Rule>) {
        self.rules.insert(key.into(), rule.into());
    }

    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(key, rule)| (key.as_str(), rule))
    }
}

impl<K, R> FromIterator<(K, R)> for TranslateMap
where
    K: Into<String>,
    R: Into<Rule>,
{
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        let mut map = TranslateMap::new();
        for (key, rule) in iter {
            map.insert(key, rule);
        }
        map
    }
}

/// Apply `map` to `raw`, producing an independent resolved view
///
/// The result never shares structure with `raw`. Keys whose path is absent
/// and that have no default resolve to `null` but stay present.
pub fn translate(raw: &Gates, map: &TranslateMap) -> Result<Gates> {
    if map.is_empty() {
        return Ok(raw.clone());
    }

    map.iter()
        .map(|(key, rule)| -> Result<(String, Value)> {
            Ok((key.to_string(), rule.apply(key, raw)?))
        })
        .collect()
}
