//! Current raw gates and resolved view
//!
//! Both trees live behind [`ArcSwap`] and are replaced wholesale; readers
//! always see either the previous or the next view, never a mix. Every read
//! hands back an owned copy. Writers of the resolved view are serialized so
//! a slow load of older raw gates cannot overwrite a newer view.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use arc_swap::ArcSwap;
use featuregates_core_types::schema::{OP_LOAD, OP_SET};
use serde_json::Value;

use crate::errors::{GateError, Result};
use crate::filter::FilterMap;
use crate::hooks::LoadHooks;
use crate::query::GateQuery;
use crate::translate::{translate, TranslateMap};
use crate::{log_op_end, log_op_error, log_op_start, Gates};

/// Interpret a delivered document as a gates mapping
///
/// `null` (an absent document) is the empty mapping.
pub fn into_gates(document: Value) -> Result<Gates> {
    match document {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Gates::new()),
        other => Err(GateError::NotAMapping {
            found: kind_name(&other).to_string(),
        }),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug)]
pub struct GateState {
    raw: ArcSwap<Gates>,
    resolved: ArcSwap<Gates>,
    translate_map: TranslateMap,
    filter_map: FilterMap,
    hooks: LoadHooks,
    write: Mutex<()>,
}

impl GateState {
    /// Fails when the hooks are inconsistent (reload logging without logger)
    pub fn new(
        raw: Gates,
        translate_map: TranslateMap,
        filter_map: FilterMap,
        hooks: LoadHooks,
    ) -> Result<Self> {
        hooks.validate()?;
        Ok(Self {
            raw: ArcSwap::from_pointee(raw),
            resolved: ArcSwap::from_pointee(Gates::new()),
            translate_map,
            filter_map,
            hooks,
            write: Mutex::new(()),
        })
    }

    /// Recompute the resolved view from the current raw gates
    ///
    /// On success the reload record is logged (when enabled) and the
    /// on-loaded callback is scheduled. On failure the previous view stays.
    pub fn load(&self) -> Result<()> {
        let started = Instant::now();
        let _write = self.write.lock().unwrap_or_else(PoisonError::into_inner);
        let raw = self.raw.load_full();
        log_op_start!(OP_LOAD, raw_len = raw.len());

        let resolved = match translate(&raw, &self.translate_map) {
            Ok(resolved) => Arc::new(resolved),
            Err(err) => {
                log_op_error!(OP_LOAD, err, duration_ms = elapsed_ms(started));
                return Err(err);
            }
        };
        self.resolved.store(resolved.clone());
        self.hooks.after_load(&raw, &resolved);

        log_op_end!(
            OP_LOAD,
            duration_ms = elapsed_ms(started),
            resolved_len = resolved.len()
        );
        Ok(())
    }

    /// Replace the raw gates without recomputing the view
    pub fn replace_raw(&self, raw: Gates) {
        self.raw.store(Arc::new(raw));
    }

    /// Inject gates directly as the resolved view
    ///
    /// With `should_translate` the gates go through the translate map first;
    /// without it they are taken as already resolved. The stored raw gates
    /// are left untouched either way.
    pub fn set(&self, gates: Value, should_translate: bool) -> Result<()> {
        let started = Instant::now();
        log_op_start!(OP_SET, should_translate = should_translate);

        let resolved = into_gates(gates).and_then(|gates| {
            if should_translate {
                translate(&gates, &self.translate_map)
            } else {
                Ok(gates)
            }
        });
        match resolved {
            Ok(resolved) => {
                let resolved_len = resolved.len();
                {
                    let _write = self.write.lock().unwrap_or_else(PoisonError::into_inner);
                    self.resolved.store(Arc::new(resolved));
                }
                log_op_end!(
                    OP_SET,
                    duration_ms = elapsed_ms(started),
                    resolved_len = resolved_len
                );
                Ok(())
            }
            Err(err) => {
                log_op_error!(OP_SET, err, duration_ms = elapsed_ms(started));
                Err(err)
            }
        }
    }

    /// Answer a query against the current resolved view
    pub fn get(&self, query: impl Into<GateQuery>) -> Result<Value> {
        let view = self.resolved.load();
        query.into().run(&view, &self.filter_map)
    }

    /// Copy of the current raw gates
    pub fn raw(&self) -> Gates {
        Gates::clone(&self.raw.load())
    }

    /// Copy of the current resolved view
    pub fn resolved(&self) -> Gates {
        Gates::clone(&self.resolved.load())
    }
}
