//! Correlation types for push subscriptions
//!
//! Every subscription opened against a document source carries an id so
//! that delivery, reload and teardown events can be tied together in logs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single push subscription
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    /// Generate a new random SubscriptionId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_id_generation() {
        let id1 = SubscriptionId::new();
        let id2 = SubscriptionId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_subscription_id_display() {
        let id = SubscriptionId::new();
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_subscription_id_serde_is_transparent_string() {
        let id = SubscriptionId::from_string("sub-1".to_string());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"sub-1\"");
        let back: SubscriptionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
