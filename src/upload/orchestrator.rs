//! Wires the walk, the limiter, the workers and the failure sink together.
//!
//! ```text
//! PathStream ──path──▶ acquire slot ──spawn──▶ UploadWorker ──failure──▶ ErrorSink
//!                          ▲                        │
//!                          └──────release───────────┘
//! ```
//!
//! A run always moves through `Init → Streaming → Draining → Closed →
//! Reported`. The report is only built after the join barrier, so it can
//! never race a worker that is still writing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::{debug, error, info, warn};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::cloud::store::ObjectStore;
use crate::config::UploadConfig;
use crate::constants::{COMPLETION_MARKER, DEFAULT_WORKERS, PATH_CHANNEL_CAPACITY};
use crate::models::{RunReport, UploadTask};
use crate::upload::error_sink;
use crate::upload::limiter::ConcurrencyLimiter;
use crate::upload::walker::PathStream;
use crate::upload::worker::UploadWorker;

/// Where a run currently is in its completion protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    /// The walk is producing paths and workers are being spawned
    Streaming,
    /// The walk has ended; spawned workers may still be running
    Draining,
    /// Every worker has finished and the failure sink is closed
    Closed,
    /// Failures printed; terminal
    Reported,
}

/// What to upload and where.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub bucket: String,
    pub source_dir: PathBuf,
    pub key_prefix: String,
    pub workers: usize,
    pub path_buffer: usize,
}

impl UploadSettings {
    pub fn new(bucket: &str, source_dir: &Path) -> Self {
        UploadSettings {
            bucket: bucket.to_string(),
            source_dir: source_dir.to_path_buf(),
            key_prefix: String::new(),
            workers: DEFAULT_WORKERS,
            path_buffer: PATH_CHANNEL_CAPACITY,
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }
}

impl From<&UploadConfig> for UploadSettings {
    fn from(config: &UploadConfig) -> Self {
        UploadSettings::new(&config.bucket, Path::new(&config.folder))
            .with_prefix(&config.prefix)
            .with_workers(config.workers)
    }
}

pub struct Orchestrator {
    store: Arc<dyn ObjectStore>,
    settings: UploadSettings,
    state: RunState,
}

impl Orchestrator {
    pub fn new(store: Arc<dyn ObjectStore>, settings: UploadSettings) -> Self {
        Orchestrator {
            store,
            settings,
            state: RunState::Init,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) {
        debug!("Run state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Upload every file below the source folder.
    ///
    /// Per-file problems end up in the returned report; only startup problems
    /// (bad worker count, a source folder that cannot be resolved or is not
    /// a directory) are returned as errors, and those happen before any
    /// upload starts.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<RunReport> {
        let limiter = ConcurrencyLimiter::new(self.settings.workers)
            .context("Invalid worker concurrency")?;
        let base_dir: Arc<Path> = tokio::fs::canonicalize(&self.settings.source_dir)
            .await
            .with_context(|| {
                format!("Failed to resolve source folder {}", self.settings.source_dir.display())
            })?
            .into();
        let is_dir = tokio::fs::metadata(&*base_dir).await.map(|m| m.is_dir()).unwrap_or(false);
        if !is_dir {
            bail!("Source folder {} is not a directory", base_dir.display());
        }
        let key_prefix: Arc<str> = Arc::from(self.settings.key_prefix.as_str());

        info!(
            "Uploading {} to bucket {} with {} workers",
            base_dir.display(),
            self.settings.bucket,
            limiter.capacity()
        );

        let worker = UploadWorker::new(Arc::clone(&self.store), &self.settings.bucket, cancel.clone());
        let (failure_tx, failure_drain) = error_sink::channel();
        let mut workers: JoinSet<bool> = JoinSet::new();
        let mut report = RunReport::default();

        let mut paths = PathStream::spawn(&base_dir, self.settings.path_buffer);
        self.transition(RunState::Streaming);

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                path = paths.next() => path,
            };
            let Some(path) = next else { break };

            // Blocks the producer while every slot is taken
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                permit = limiter.acquire() => Some(permit),
            };
            let Some(permit) = permit else { break };

            let task = UploadTask::new(path, Arc::clone(&base_dir), Arc::clone(&key_prefix));
            workers.spawn(worker.clone().process(task, permit, failure_tx.clone()));

            while let Some(result) = workers.try_join_next() {
                record_worker_exit(result, &mut report);
            }
        }

        if cancel.is_cancelled() {
            warn!("Cancellation requested, no further files will be started");
            report.cancelled = true;
        }

        self.transition(RunState::Draining);
        report.walk = paths.finish().await;

        while let Some(result) = workers.join_next().await {
            record_worker_exit(result, &mut report);
        }
        failure_tx.close();
        self.transition(RunState::Closed);

        report.failures = failure_drain.drain().await;
        for failure in &report.failures {
            eprintln!("Error: {}", failure);
        }
        println!("{}", COMPLETION_MARKER);
        self.transition(RunState::Reported);

        info!(
            "{} uploaded, {} failed, {} discovered (peak concurrency {})",
            report.uploaded,
            report.failed(),
            report.walk.files_found,
            limiter.peak()
        );
        Ok(report)
    }
}

fn record_worker_exit(result: Result<bool, JoinError>, report: &mut RunReport) {
    match result {
        Ok(true) => report.uploaded += 1,
        Ok(false) => {}
        Err(e) => {
            error!("Upload worker terminated abnormally: {}", e);
            report.aborted_workers += 1;
        }
    }
}
