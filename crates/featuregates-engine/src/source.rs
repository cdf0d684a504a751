//! Document source abstraction
//!
//! A source pushes the document stored at a path to a handler: once with
//! the current content and again after every change. Delivery stops when
//! the returned [`Subscription`] is dropped or cancelled.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use featuregates_core::Result;
use featuregates_core_types::SubscriptionId;
use serde_json::Value;

/// Receives every delivered document (or the error that replaced it)
pub type UpdateHandler = Arc<dyn Fn(Result<Value>) + Send + Sync>;

#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Start delivering the document at `path` to `on_update`
    ///
    /// Implementations may deliver the current document before returning.
    fn subscribe(&self, path: &str, on_update: UpdateHandler) -> Result<Subscription>;

    /// Read the document at `path` once; an absent document is `null`
    async fn fetch_once(&self, path: &str) -> Result<Value>;
}

/// Live subscription handle; dropping it stops delivery
pub struct Subscription {
    id: SubscriptionId,
    path: String,
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(
        id: SubscriptionId,
        path: impl Into<String>,
        cancel: impl FnOnce() + Send + Sync + 'static,
    ) -> Self {
        Self {
            id,
            path: path.into(),
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Stop delivery now instead of at drop
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
            tracing::debug!(
                subscription_id = %self.id,
                source_path = %self.path,
                "subscription released"
            );
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
