//! Shared fixtures for the integration tests.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::AsyncReadExt;

use bucket_uploader::cloud::store::{ObjectStore, PutObjectInput, StoreError};

/// One object as the store received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// In-memory [`ObjectStore`] that records every write and tracks how many
/// writes overlap.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, StoredObject>>,
    failing_keys: HashSet<String>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    completed: AtomicUsize,
    attempts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every write open for `delay` before storing it.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Reject writes to `key` with a service error.
    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing_keys.insert(key.to_string());
        self
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> HashSet<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_object(&self, input: PutObjectInput) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let result = if self.failing_keys.contains(&input.key) {
            Err(StoreError::Service(format!("AccessDenied: {}", input.key)))
        } else {
            let PutObjectInput { bucket, key, content_type, mut body, .. } = input;
            let mut data = Vec::new();
            match body.read_to_end(&mut data).await {
                Ok(_) => {
                    self.objects.lock().unwrap().insert(
                        key,
                        StoredObject { bucket, content_type, body: data },
                    );
                    Ok(())
                }
                Err(e) => Err(StoreError::Io(e)),
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}

/// Write `files` (relative path, content) below `root`, creating parents.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) -> Result<()> {
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
    }
    Ok(())
}

/// Create `count` small files spread over a few subdirectories.
pub fn write_many(root: &Path, count: usize) -> Result<()> {
    for i in 0..count {
        let dir = root.join(format!("batch{}", i % 4));
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("file{}.txt", i)), format!("content {}", i))?;
    }
    Ok(())
}
