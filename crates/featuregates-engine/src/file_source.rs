//! JSON files on disk as a document source
//!
//! Paths are resolved against a root directory. Subscriptions read the
//! file on a fixed interval and redeliver whenever the SHA-256 digest of its
//! content changes; a missing file is delivered as `null`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use featuregates_core::{GateError, Result};
use featuregates_core_types::SubscriptionId;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::source::{DocumentSource, Subscription, UpdateHandler};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
    interval: Duration,
}

/// What was last observed on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fingerprint {
    Missing,
    Present([u8; 32]),
}

impl Fingerprint {
    fn of(content: Option<&[u8]>) -> Self {
        match content {
            Some(bytes) => Fingerprint::Present(Sha256::digest(bytes).into()),
            None => Fingerprint::Missing,
        }
    }
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn file_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

fn source_error(path: &str, message: impl std::fmt::Display) -> GateError {
    GateError::Source {
        path: path.to_string(),
        message: message.to_string(),
    }
}

/// File content, or `None` when the file does not exist
async fn read_content(file: &Path) -> std::io::Result<Option<Vec<u8>>> {
    match tokio::fs::read(file).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

fn parse_document(content: Option<&[u8]>, path: &str) -> Result<Value> {
    match content {
        Some(bytes) => serde_json::from_slice(bytes).map_err(|err| source_error(path, err)),
        None => Ok(Value::Null),
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    fn subscribe(&self, path: &str, on_update: UpdateHandler) -> Result<Subscription> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| source_error(path, "file subscriptions need a tokio runtime"))?;
        let file = self.file_path(path);
        let period = self.interval;
        let doc_path = path.to_string();

        let poller = runtime.spawn(async move {
            let mut last: Option<Fingerprint> = None;
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let content = match read_content(&file).await {
                    Ok(content) => content,
                    Err(err) => {
                        tracing::warn!(source_path = %doc_path, error = %err, "cannot read gates file");
                        continue;
                    }
                };
                let current = Fingerprint::of(content.as_deref());
                if last == Some(current) {
                    continue;
                }
                last = Some(current);
                on_update(parse_document(content.as_deref(), &doc_path));
            }
        });

        Ok(Subscription::new(SubscriptionId::new(), path, move || {
            poller.abort()
        }))
    }

    async fn fetch_once(&self, path: &str) -> Result<Value> {
        let content = read_content(&self.file_path(path))
            .await
            .map_err(|err| source_error(path, err))?;
        parse_document(content.as_deref(), path)
    }
}
