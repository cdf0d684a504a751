//! featuregates engine - acquisition and public surface
//!
//! Builds on `featuregates-core` with:
//! - The `DocumentSource` abstraction plus in-memory and file sources
//! - The reload state machine driving loads from pushed documents
//! - `FeatureGates`, the builder-constructed public API
//! - TOML configuration resolved through a registry of named code

pub mod config;
pub mod file_source;
pub mod gates;
pub mod memory_source;
pub mod reload;
pub mod source;

pub use config::{DetailedRule, GatesConfig, Registry, RuleConfig};
pub use file_source::FileSource;
pub use gates::{FeatureGates, FeatureGatesBuilder};
pub use memory_source::MemorySource;
pub use reload::{OnReloadError, PushSource, ReloadPhase};
pub use source::{DocumentSource, Subscription, UpdateHandler};

// Re-export the core vocabulary so most programs need only this crate
pub use featuregates_core::{
    FilterMap, FilterParams, GateError, GateQuery, Gates, ReloadLogger, Result, Rule,
    StdoutLogger, TracingLogger, TranslateMap,
};
