//! Core types shared across the featuregates crates
//!
//! - **Correlation types**: SubscriptionId for tracking push subscriptions
//! - **Schema constants**: Canonical field keys, operation and event names

pub mod correlation;
pub mod schema;

pub use correlation::SubscriptionId;
