//! Query shapes accepted by `get`

use serde_json::Value;

use crate::errors::Result;
use crate::filter::{FilterMap, FilterParams};
use crate::path;
use crate::Gates;

/// One read against the resolved view
///
/// `&str`/`String` convert to [`GateQuery::Key`], `()` to
/// [`GateQuery::All`] and [`FilterParams`] to [`GateQuery::FilterAll`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GateQuery {
    /// The entire resolved view
    #[default]
    All,
    /// Value at a key or dotted sub-path, with a default for absent paths
    Key { key: String, default: Option<Value> },
    /// A single key passed through its filter
    Filtered { key: String, params: FilterParams },
    /// Every key passed through its filter with the same parameters
    FilterAll(FilterParams),
}

impl GateQuery {
    pub fn all() -> Self {
        GateQuery::All
    }

    pub fn key(key: impl Into<String>) -> Self {
        GateQuery::Key {
            key: key.into(),
            default: None,
        }
    }

    pub fn key_or(key: impl Into<String>, default: Value) -> Self {
        GateQuery::Key {
            key: key.into(),
            default: Some(default),
        }
    }

    pub fn filtered(key: impl Into<String>, params: FilterParams) -> Self {
        GateQuery::Filtered {
            key: key.into(),
            params,
        }
    }

    pub fn filter_all(params: FilterParams) -> Self {
        GateQuery::FilterAll(params)
    }

    /// Evaluate against `view`; the result never borrows from it
    pub fn run(&self, view: &Gates, filters: &FilterMap) -> Result<Value> {
        match self {
            GateQuery::All => Ok(Value::Object(view.clone())),
            GateQuery::Key { key, default } => {
                Ok(path::resolve_or(view, key, default.clone()).unwrap_or(Value::Null))
            }
            GateQuery::Filtered { key, params } => filters.apply(view, key, params),
            GateQuery::FilterAll(params) => filters.apply_all(view, params).map(Value::Object),
        }
    }
}

impl From<&str> for GateQuery {
    fn from(key: &str) -> Self {
        GateQuery::key(key)
    }
}

impl From<String> for GateQuery {
    fn from(key: String) -> Self {
        GateQuery::key(key)
    }
}

impl From<()> for GateQuery {
    fn from(_: ()) -> Self {
        GateQuery::All
    }
}

impl From<FilterParams> for GateQuery {
    fn from(params: FilterParams) -> Self {
        GateQuery::FilterAll(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> serde_json::Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_conversions_pick_shape() {
        assert_eq!(GateQuery::from("a.b"), GateQuery::key("a.b"));
        assert_eq!(GateQuery::from(()), GateQuery::All);
        let params = object(json!({"ws": "1"}));
        assert_eq!(
            GateQuery::from(params.clone()),
            GateQuery::FilterAll(params)
        );
    }

    #[test]
    fn test_key_sub_path_and_default() {
        let view = object(json!({"admins": ["a@x", "b@y"]}));
        let filters = FilterMap::new();
        assert_eq!(
            GateQuery::key("admins.1").run(&view, &filters).unwrap(),
            json!("b@y")
        );
        assert_eq!(
            GateQuery::key_or("blast", json!({})).run(&view, &filters).unwrap(),
            json!({})
        );
        assert_eq!(
            GateQuery::key("blast").run(&view, &filters).unwrap(),
            Value::Null
        );
    }
}
