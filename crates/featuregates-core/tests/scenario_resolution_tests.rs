#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::*;
use featuregates_core::{FilterMap, GateError, GateQuery, Rule, TranslateMap};
use serde_json::{json, Value};

#[test]
fn test_scenario_a_bare_path() {
    let state = loaded_state(
        gates(json!({"a": {"b": 5}})),
        TranslateMap::new().rule("x", "a.b"),
        FilterMap::new(),
    );
    assert_eq!(state.get("x").unwrap(), json!(5));
}

#[test]
fn test_scenario_b_default_for_absent_path() {
    let state = loaded_state(
        gates(json!({"a": {}})),
        TranslateMap::new().rule("x", Rule::path("a.b").with_default(json!(0))),
        FilterMap::new(),
    );
    assert_eq!(state.get("x").unwrap(), json!(0));
}

#[test]
fn test_scenario_c_transformer() {
    let state = loaded_state(
        gates(json!({"a": {"b": 3}})),
        TranslateMap::new().rule(
            "total",
            Rule::path("a.b").with_transformer(|v| Ok(json!(v.as_i64().unwrap_or(0) * 2))),
        ),
        FilterMap::new(),
    );
    assert_eq!(state.get("total").unwrap(), json!(6));
}

#[test]
fn test_scenario_d_filter_with_params() {
    let filters = FilterMap::new().filter("f", |value, params| {
        let mut merged = value["defaults"].as_object().cloned().unwrap_or_default();
        let ws = params.get("ws").and_then(Value::as_str).unwrap_or_default();
        if let Some(overrides) = value[ws].as_object() {
            merged.extend(overrides.clone());
        }
        Ok(Value::Object(merged))
    });
    let state = loaded_state(
        gates(json!({"f": {"defaults": {"k": 1}, "ws1": {"k": 2}}})),
        TranslateMap::new(),
        filters,
    );

    let value = state
        .get(GateQuery::filtered("f", gates(json!({"ws": "ws1"}))))
        .unwrap();
    assert_eq!(value, json!({"k": 2}));
}

#[test]
fn test_set_with_translation() {
    let state = loaded_state(Default::default(), basic_translate_map(), FilterMap::new());
    state.set(Value::Object(dummy_gates()), true).unwrap();

    assert_eq!(
        state.get(()).unwrap(),
        json!({
            "preprocessEnabledWorkspaces": [1, 2, 3],
            "testValues": "there"
        })
    );
    assert_eq!(state.get("testValues").unwrap(), json!("there"));
}

#[test]
fn test_get_missing_gate_with_default() {
    let state = loaded_state(dummy_gates(), basic_translate_map(), FilterMap::new());
    assert_eq!(
        state.get(GateQuery::key_or("blast", json!({}))).unwrap(),
        json!({})
    );
}

#[test]
fn test_set_rejects_non_mapping() {
    let state = loaded_state(dummy_gates(), basic_translate_map(), FilterMap::new());
    let err = state.set(json!("not gates"), false).unwrap_err();
    assert_eq!(
        err,
        GateError::NotAMapping {
            found: "string".to_string()
        }
    );
    assert_eq!(state.get("testValues").unwrap(), json!("there"));
}

#[test]
fn test_unfiltered_view() {
    let state = loaded_state(
        filter_gates(),
        filter_translate_map(),
        workspace_filter_map(),
    );
    assert_eq!(
        state.get(()).unwrap(),
        json!({
            "filters": {
                "defaults": {
                    "defaultTest1": "dtest1",
                    "defaultTest2": "dtest2"
                },
                "ws1": {
                    "ws1Test1": "w1test1",
                    "ws1Test2": "w1test2"
                }
            }
        })
    );
}

#[test]
fn test_bulk_filtered_view() {
    let state = loaded_state(
        filter_gates(),
        filter_translate_map(),
        workspace_filter_map(),
    );
    let params = gates(json!({"workspaceId": "ws1"}));
    assert_eq!(
        state.get(params).unwrap(),
        json!({
            "filters": {
                "defaultTest1": "dtest1",
                "defaultTest2": "dtest2",
                "ws1Test1": "w1test1",
                "ws1Test2": "w1test2"
            }
        })
    );
}

#[test]
fn test_single_filtered_gate() {
    let state = loaded_state(
        filter_gates(),
        filter_translate_map(),
        workspace_filter_map(),
    );
    let params = gates(json!({"workspaceId": "ws1"}));
    assert_eq!(
        state.get(GateQuery::filtered("filters", params)).unwrap(),
        json!({
            "defaultTest1": "dtest1",
            "defaultTest2": "dtest2",
            "ws1Test1": "w1test1",
            "ws1Test2": "w1test2"
        })
    );
}

#[test]
fn test_bulk_filter_passes_unfiltered_keys_through() {
    let raw = filter_gates();
    let map = filter_translate_map().rule("plain", "atoms.filters.defaultFilters.defaultTest1");
    let state = loaded_state(raw, map, workspace_filter_map());

    let view = state
        .get(gates(json!({"workspaceId": "unknown"})))
        .unwrap();
    assert_eq!(view["plain"], json!("dtest1"));
    assert_eq!(
        view["filters"],
        json!({"defaultTest1": "dtest1", "defaultTest2": "dtest2"})
    );
}

#[test]
fn test_deleting_keys_from_result_does_not_leak() {
    let state = loaded_state(
        gates(json!({
            "secret": {
                "admins": ["test@doma.in", "user@example.com"],
                "internalDomains": ["doma.in", "example.com"]
            },
            "other": {"testers": {"hi": "there"}}
        })),
        TranslateMap::new()
            .rule("admins", "secret.admins")
            .rule("internalDomains", "secret.internalDomains")
            .rule("testValues", "other.testers.hi"),
        FilterMap::new(),
    );

    let mut view = state.get(()).unwrap();
    let object = view.as_object_mut().unwrap();
    object.remove("admins");
    object.remove("internalDomains");

    assert_eq!(
        state.get(()).unwrap(),
        json!({
            "admins": ["test@doma.in", "user@example.com"],
            "internalDomains": ["doma.in", "example.com"],
            "testValues": "there"
        })
    );
}

#[test]
fn test_mutating_keyed_result_does_not_leak() {
    let state = loaded_state(dummy_gates(), basic_translate_map(), FilterMap::new());

    let mut list = state.get("preprocessEnabledWorkspaces").unwrap();
    list.as_array_mut().unwrap().clear();

    assert_eq!(
        state.get("preprocessEnabledWorkspaces").unwrap(),
        json!([1, 2, 3])
    );
}

#[test]
fn test_filter_error_reaches_caller() {
    let filters = FilterMap::new().filter("f", |_, _| Err(anyhow::anyhow!("context missing")));
    let state = loaded_state(gates(json!({"f": 1})), TranslateMap::new(), filters);

    let err = state
        .get(GateQuery::filtered("f", Default::default()))
        .unwrap_err();
    assert!(matches!(err, GateError::Filter { ref key, .. } if key == "f"));
}
