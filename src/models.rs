use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::cloud::store::StoreError;
use crate::utils::{content_type, keys};

/// One file to upload, relative to the walk root it was discovered under.
#[derive(Debug, Clone)]
pub struct UploadTask {
    pub path: PathBuf,
    pub base_dir: Arc<Path>,
    pub key_prefix: Arc<str>,
}

impl UploadTask {
    pub fn new(path: PathBuf, base_dir: Arc<Path>, key_prefix: Arc<str>) -> Self {
        UploadTask { path, base_dir, key_prefix }
    }

    /// Path of the file below `base_dir`. Fails only if the walk produced a
    /// path outside its own root.
    pub fn relative_path(&self) -> Result<&Path, UploadError> {
        self.path
            .strip_prefix(&*self.base_dir)
            .map_err(|_| UploadError::OutsideBaseDir {
                base_dir: self.base_dir.to_path_buf(),
            })
    }

    /// Object key: the prefix joined with the relative path, forward slashes only.
    pub fn destination_key(&self) -> Result<String, UploadError> {
        let relative = self.relative_path()?;
        keys::destination_key(&self.key_prefix, relative).ok_or(UploadError::NonUtf8Path)
    }

    pub fn content_type(&self) -> &'static str {
        content_type::infer(&self.path)
    }
}

/// Why a single file could not be uploaded.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to open file: {0}")]
    Open(#[source] io::Error),

    #[error("failed to read file metadata: {0}")]
    Metadata(#[source] io::Error),

    #[error("failed to calculate relative path: not under {}", base_dir.display())]
    OutsideBaseDir { base_dir: PathBuf },

    #[error("file name is not valid UTF-8 and has no object key")]
    NonUtf8Path,

    #[error("failed to upload: {0}")]
    Store(#[from] StoreError),

    #[error("upload cancelled")]
    Cancelled,
}

/// A failed upload together with the source path, so it can be retried by hand.
#[derive(Debug, Error)]
#[error("failed to upload file {}: {cause}", path.display())]
pub struct UploadFailure {
    pub path: PathBuf,
    #[source]
    pub cause: UploadError,
}

#[derive(Debug)]
pub enum UploadOutcome {
    Success { key: String },
    Failure(UploadFailure),
}

/// What the directory walk produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Number of file paths handed to the orchestrator
    pub files_found: usize,
    /// Traversal error that ended the walk early, if any
    pub truncated_by: Option<String>,
}

/// Aggregate result of one run, built only after every worker has finished.
#[derive(Debug, Default)]
pub struct RunReport {
    pub uploaded: usize,
    pub failures: Vec<UploadFailure>,
    pub walk: WalkStats,
    /// Workers that terminated without producing an outcome (panicked)
    pub aborted_workers: usize,
    pub cancelled: bool,
}

impl RunReport {
    /// True when every discovered file was uploaded and nothing was cut short.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
            && self.aborted_workers == 0
            && self.walk.truncated_by.is_none()
            && !self.cancelled
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(path: &str, base: &str, prefix: &str) -> UploadTask {
        UploadTask::new(PathBuf::from(path), Arc::from(Path::new(base)), Arc::from(prefix))
    }

    #[test]
    fn test_destination_key_with_prefix() {
        let t = task("/data/src/sub/b.txt", "/data/src", "up");
        assert_eq!(t.destination_key().unwrap(), "up/sub/b.txt");
    }

    #[test]
    fn test_destination_key_without_prefix() {
        let t = task("/data/src/a.txt", "/data/src", "");
        assert_eq!(t.destination_key().unwrap(), "a.txt");
    }

    #[test]
    fn test_foreign_separator_normalized() {
        let t = task("/a/b/c\\d.txt", "/a/b", "x");
        assert_eq!(t.destination_key().unwrap(), "x/c/d.txt");
    }

    #[test]
    fn test_path_outside_base_dir() {
        let t = task("/elsewhere/a.txt", "/data/src", "up");
        match t.destination_key() {
            Err(UploadError::OutsideBaseDir { base_dir }) => {
                assert_eq!(base_dir, PathBuf::from("/data/src"));
            }
            other => panic!("Expected OutsideBaseDir, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_file_name_is_an_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new("/data/src").join(OsStr::from_bytes(b"a\xff.txt"));
        let t = UploadTask::new(path, Arc::from(Path::new("/data/src")), Arc::from("up"));
        assert!(matches!(t.destination_key(), Err(UploadError::NonUtf8Path)));
    }

    #[test]
    fn test_failure_display_includes_path_and_cause() {
        let failure = UploadFailure {
            path: PathBuf::from("/data/src/a.txt"),
            cause: UploadError::Open(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
        };
        let msg = failure.to_string();
        assert!(msg.contains("/data/src/a.txt"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_report_success_rules() {
        let mut report = RunReport::default();
        assert!(report.is_success());

        report.walk.truncated_by = Some("permission denied".to_string());
        assert!(!report.is_success());

        report.walk.truncated_by = None;
        report.failures.push(UploadFailure {
            path: PathBuf::from("/x"),
            cause: UploadError::Cancelled,
        });
        assert!(!report.is_success());
        assert_eq!(report.failed(), 1);
    }
}
