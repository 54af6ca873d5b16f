//! Recursive directory walk feeding the upload pipeline.
//!
//! The walk runs on a blocking thread and pushes file paths into a bounded
//! channel, so it can never run more than a few entries ahead of the
//! orchestrator. Closing the channel is the end-of-sequence signal.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use walkdir::WalkDir;

use crate::models::WalkStats;

/// One entry seen by the walk.
#[derive(Debug)]
pub enum WalkOutcome {
    File(PathBuf),
    Directory,
    /// FIFOs, sockets, device nodes and links to anything but a file
    Special(PathBuf),
    Error { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) if entry.file_type().is_dir() => WalkOutcome::Directory,
        Ok(entry) if entry.file_type().is_file() => WalkOutcome::File(entry.into_path()),
        Ok(entry) if entry.file_type().is_symlink() => {
            // Not followed during the walk; a dangling link is still emitted
            // so the failed open shows up in the report.
            match fs::metadata(entry.path()) {
                Ok(meta) if !meta.is_file() => WalkOutcome::Special(entry.into_path()),
                _ => WalkOutcome::File(entry.into_path()),
            }
        }
        Ok(entry) => WalkOutcome::Special(entry.into_path()),
        Err(err) => WalkOutcome::Error {
            msg: err.to_string(),
            path: err.path().map(Path::to_path_buf),
        },
    }
}

/// Consume `iter`, sending every file path to `path_tx`.
///
/// Stops at the first traversal error (logged and recorded in the returned
/// stats) or when the receiver goes away. Must run outside the async
/// executor since it uses `blocking_send`.
pub fn run_walk_loop<I>(iter: I, path_tx: &mpsc::Sender<PathBuf>) -> WalkStats
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut stats = WalkStats::default();
    for outcome in iter {
        match outcome {
            WalkOutcome::Directory => {}
            WalkOutcome::Special(path) => {
                debug!("Skipping non-regular file {}", path.display());
            }
            WalkOutcome::File(path) => {
                if path_tx.blocking_send(path).is_err() {
                    debug!("Path receiver dropped, stopping walk");
                    break;
                }
                stats.files_found += 1;
            }
            WalkOutcome::Error { msg, path } => {
                let at = path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                error!("Error retrieving files from directory {}: {}", at, msg);
                stats.truncated_by = Some(msg);
                break;
            }
        }
    }
    stats
}

/// Lazy, finite stream of file paths below a root directory.
pub struct PathStream {
    rx: mpsc::Receiver<PathBuf>,
    handle: JoinHandle<WalkStats>,
}

impl PathStream {
    /// Start walking `root` on a blocking thread. At most `capacity` paths
    /// are buffered ahead of the consumer.
    pub fn spawn(root: &Path, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let root = root.to_path_buf();

        let handle = tokio::task::spawn_blocking(move || {
            debug!("Walking {}", root.display());
            let iter = WalkDir::new(&root)
                .follow_links(false)
                .into_iter()
                .map(to_outcome);
            let stats = run_walk_loop(iter, &tx);
            debug!("Walk of {} finished: {} files", root.display(), stats.files_found);
            stats
        });

        PathStream { rx, handle }
    }

    /// Next file path, or `None` once the walk has ended.
    pub async fn next(&mut self) -> Option<PathBuf> {
        self.rx.recv().await
    }

    /// Stop consuming and wait for the walk thread to exit.
    pub async fn finish(self) -> WalkStats {
        let PathStream { rx, handle } = self;
        // Unblocks a walk still waiting on a full channel
        drop(rx);
        match handle.await {
            Ok(stats) => stats,
            Err(e) => {
                error!("Directory walk thread failed: {}", e);
                WalkStats {
                    files_found: 0,
                    truncated_by: Some(format!("walk thread failed: {}", e)),
                }
            }
        }
    }
}
