use featuregates_core::{FilterMap, GateState, Gates, LoadHooks, Rule, TranslateMap};
use serde_json::{json, Value};

/// Unwrap a JSON object literal into a gates mapping
#[allow(dead_code)]
pub fn gates(value: Value) -> Gates {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object fixture, got {other}"),
    }
}

/// Raw gates shaped like a typical remote document
#[allow(dead_code)]
pub fn dummy_gates() -> Gates {
    gates(json!({
        "workspaces": {
            "preprocess-enabled": [1, 2, 3]
        },
        "test": {
            "testers": {
                "hi": "there"
            }
        }
    }))
}

#[allow(dead_code)]
pub fn basic_translate_map() -> TranslateMap {
    TranslateMap::new()
        .rule("preprocessEnabledWorkspaces", "workspaces.preprocess-enabled")
        .rule("testValues", "test.testers.hi")
}

/// Raw gates carrying per-workspace filter overrides
#[allow(dead_code)]
pub fn filter_gates() -> Gates {
    gates(json!({
        "atoms": {
            "filters": {
                "defaultFilters": {
                    "defaultTest1": "dtest1",
                    "defaultTest2": "dtest2"
                },
                "workspaces": {
                    "ws1": {
                        "ws1Test1": "w1test1",
                        "ws1Test2": "w1test2"
                    }
                }
            }
        }
    }))
}

/// Translate map folding `workspaces` next to a `defaults` entry
#[allow(dead_code)]
pub fn filter_translate_map() -> TranslateMap {
    TranslateMap::new().rule(
        "filters",
        Rule::path("atoms.filters").with_transformer(|value| {
            let mut folded = serde_json::Map::new();
            folded.insert("defaults".to_string(), value["defaultFilters"].clone());
            if let Some(workspaces) = value["workspaces"].as_object() {
                folded.extend(workspaces.clone());
            }
            Ok(Value::Object(folded))
        }),
    )
}

/// Filter merging a workspace's overrides on top of the defaults
#[allow(dead_code)]
pub fn workspace_filter_map() -> FilterMap {
    FilterMap::new().filter("filters", |value, params| {
        let mut merged = value["defaults"].as_object().cloned().unwrap_or_default();
        let workspace = params
            .get("workspaceId")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if let Some(overrides) = value[workspace].as_object() {
            merged.extend(overrides.clone());
        }
        Ok(Value::Object(merged))
    })
}

#[allow(dead_code)]
pub fn loaded_state(raw: Gates, translate_map: TranslateMap, filter_map: FilterMap) -> GateState {
    let state = GateState::new(raw, translate_map, filter_map, LoadHooks::default()).unwrap();
    state.load().unwrap();
    state
}
