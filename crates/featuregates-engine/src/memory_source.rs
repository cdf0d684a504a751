//! In-process document source
//!
//! Holds documents per path and pushes every `publish` to the live
//! subscribers of that path. Useful for tests, demos and for embedding
//! programs that receive gate documents through their own channel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use featuregates_core::{GateError, Result};
use featuregates_core_types::SubscriptionId;
use serde_json::Value;

use crate::source::{DocumentSource, Subscription, UpdateHandler};

#[derive(Default)]
struct Inner {
    documents: HashMap<String, Value>,
    subscribers: HashMap<SubscriptionId, (String, UpdateHandler)>,
}

#[derive(Clone, Default)]
pub struct MemorySource {
    inner: Arc<Mutex<Inner>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source already holding `document` at `path`
    pub fn with_document(path: impl Into<String>, document: Value) -> Self {
        let source = Self::new();
        source.lock().documents.insert(path.into(), document);
        source
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handlers_for(&self, path: &str) -> Vec<UpdateHandler> {
        self.lock()
            .subscribers
            .values()
            .filter(|(subscribed, _)| subscribed == path)
            .map(|(_, handler)| handler.clone())
            .collect()
    }

    /// Store `document` at `path` and deliver it to every subscriber
    pub fn publish(&self, path: &str, document: Value) {
        self.lock()
            .documents
            .insert(path.to_string(), document.clone());
        for handler in self.handlers_for(path) {
            handler(Ok(document.clone()));
        }
    }

    /// Deliver a source failure to every subscriber of `path`
    pub fn publish_error(&self, path: &str, message: impl Into<String>) {
        let err = GateError::Source {
            path: path.to_string(),
            message: message.into(),
        };
        for handler in self.handlers_for(path) {
            handler(Err(err.clone()));
        }
    }

    pub fn subscriber_count(&self, path: &str) -> usize {
        self.lock()
            .subscribers
            .values()
            .filter(|(subscribed, _)| subscribed == path)
            .count()
    }
}

#[async_trait]
impl DocumentSource for MemorySource {
    fn subscribe(&self, path: &str, on_update: UpdateHandler) -> Result<Subscription> {
        let id = SubscriptionId::new();
        let current = {
            let mut inner = self.lock();
            inner
                .subscribers
                .insert(id.clone(), (path.to_string(), on_update.clone()));
            inner.documents.get(path).cloned()
        };

        // Handlers run outside the lock so they may publish or unsubscribe
        if let Some(document) = current {
            on_update(Ok(document));
        }

        let inner = Arc::downgrade(&self.inner);
        let key = id.clone();
        Ok(Subscription::new(id, path, move || {
            if let Some(inner) = inner.upgrade() {
                inner
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .subscribers
                    .remove(&key);
            }
        }))
    }

    async fn fetch_once(&self, path: &str) -> Result<Value> {
        Ok(self
            .lock()
            .documents
            .get(path)
            .cloned()
            .unwrap_or(Value::Null))
    }
}
