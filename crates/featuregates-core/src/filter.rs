//! Per-key contextual filters over the resolved view
//!
//! Filtering is opt-in: only keys with a registered filter are rewritten,
//! every other key passes through untouched whatever parameters are given.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::{GateError, Result};
use crate::Gates;

/// Caller-supplied context handed to every filter (e.g. a workspace id)
pub type FilterParams = serde_json::Map<String, Value>;

/// Filter function: `(current value, params) -> filtered value`
///
/// The current value is `null` when the key is not in the resolved view.
pub type FilterFn = Arc<dyn Fn(&Value, &FilterParams) -> anyhow::Result<Value> + Send + Sync>;

/// Mapping from output key to its filter
#[derive(Clone, Default)]
pub struct FilterMap {
    filters: HashMap<String, FilterFn>,
}

impl FilterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn filter<F>(mut self, key: impl Into<String>, filter: F) -> Self
    where
        F: Fn(&Value, &FilterParams) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.insert(key, Arc::new(filter));
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, filter: FilterFn) {
        self.filters.insert(key.into(), filter);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.filters.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Value of `key` in `view`, passed through its filter when one exists
    pub fn apply(&self, view: &Gates, key: &str, params: &FilterParams) -> Result<Value> {
        let current = view.get(key);
        match self.filters.get(key) {
            Some(filter) => {
                filter(current.unwrap_or(&Value::Null), params).map_err(|err| GateError::Filter {
                    key: key.to_string(),
                    message: format!("{err:#}"),
                })
            }
            None => Ok(current.cloned().unwrap_or(Value::Null)),
        }
    }

    /// Every key of `view`, each passed through [`apply`](Self::apply)
    pub fn apply_all(&self, view: &Gates, params: &FilterParams) -> Result<Gates> {
        view.keys()
            .map(|key| -> Result<(String, Value)> {
                Ok((key.clone(), self.apply(view, key, params)?))
            })
            .collect()
    }
}

impl fmt::Debug for FilterMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.filters.keys().collect();
        keys.sort();
        f.debug_struct("FilterMap").field("keys", &keys).finish()
    }
}
