//! featuregates core - resolution engine
//!
//! Turns a raw, loosely-structured gates tree into a stable resolved view:
//! - Path lookup with defaults (`path`)
//! - Declarative translation with defaults and transformers (`translate`)
//! - Opt-in per-key contextual filters (`filter`)
//! - Atomically swapped raw/resolved state with load hooks (`state`, `hooks`)
//! - The `get` query shapes (`query`)
//!
//! Acquisition from a document source lives in `featuregates-engine`.

pub mod errors;
pub mod filter;
pub mod hooks;
pub mod logging_facility;
pub mod path;
pub mod query;
pub mod state;
pub mod translate;

/// Nested mapping of JSON values: the shape of raw gates and resolved views
pub type Gates = serde_json::Map<String, serde_json::Value>;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, GateError, Result};
pub use filter::{FilterFn, FilterMap, FilterParams};
pub use hooks::{LoadHooks, OnLoaded, ReloadLogger, StdoutLogger, TracingLogger};
pub use query::GateQuery;
pub use state::{into_gates, GateState};
pub use translate::{translate, Rule, Transformer, TranslateMap};
