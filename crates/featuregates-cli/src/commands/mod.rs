pub mod resolve;
pub mod watch;

use std::path::Path;

use featuregates_engine::{FeatureGatesBuilder, GatesConfig, Registry};
use serde_json::{Map, Value};

/// Registry of the named transformers and filters a config file may use
///
/// - `count`: length of an array, object or string
/// - `enabled`: truthiness of the value
/// - `overlay`: start from the `defaults` object, then merge the object
///   stored under each parameter value
pub fn builtin_registry() -> Registry {
    Registry::new()
        .with_transformer("count", |value| {
            let len = match &value {
                Value::Array(items) => items.len(),
                Value::Object(fields) => fields.len(),
                Value::String(text) => text.chars().count(),
                Value::Null => 0,
                other => anyhow::bail!("cannot count {other}"),
            };
            Ok(Value::from(len))
        })
        .with_transformer("enabled", |value| {
            let enabled = match &value {
                Value::Null => false,
                Value::Bool(flag) => *flag,
                Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
                Value::String(text) => !text.is_empty(),
                Value::Array(_) | Value::Object(_) => true,
            };
            Ok(Value::Bool(enabled))
        })
        .with_filter("overlay", |value, params| {
            let mut merged = value
                .get("defaults")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            for param in params.values() {
                let Some(name) = param.as_str() else {
                    continue;
                };
                if let Some(overrides) = value.get(name).and_then(Value::as_object) {
                    merged.extend(overrides.clone());
                }
            }
            Ok(Value::Object(merged))
        })
}

/// Apply an optional config file to `builder`
pub fn configure(
    builder: FeatureGatesBuilder,
    config: Option<&Path>,
) -> Result<FeatureGatesBuilder, Box<dyn std::error::Error>> {
    match config {
        Some(path) => {
            let config = GatesConfig::from_file(path)?;
            Ok(config.configure(builder, &builtin_registry())?)
        }
        None => Ok(builder),
    }
}

/// Parse `name=value`; the value is read as JSON when it parses, else as a string
pub fn parse_param(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    if name.is_empty() {
        return Err(format!("missing parameter name in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

pub fn params(pairs: Vec<(String, Value)>) -> Map<String, Value> {
    pairs.into_iter().collect()
}
