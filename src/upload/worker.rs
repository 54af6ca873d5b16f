use std::sync::Arc;

use log::debug;
use tokio::fs::File;
use tokio_util::sync::CancellationToken;

use crate::cloud::store::{ObjectStore, PutObjectInput};
use crate::constants::SUCCESS_LINE_PREFIX;
use crate::models::{UploadError, UploadFailure, UploadOutcome, UploadTask};
use crate::upload::error_sink::FailureSender;
use crate::upload::limiter::LimiterPermit;

/// Uploads single files to one bucket.
///
/// Cheap to clone: the store handle is shared read-only by every worker.
#[derive(Clone)]
pub struct UploadWorker {
    store: Arc<dyn ObjectStore>,
    bucket: Arc<str>,
    cancel: CancellationToken,
}

impl UploadWorker {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: &str, cancel: CancellationToken) -> Self {
        UploadWorker {
            store,
            bucket: Arc::from(bucket),
            cancel,
        }
    }

    /// Upload one file and describe what happened. Never panics on I/O or
    /// storage errors; those become a `Failure` outcome.
    pub async fn upload(&self, task: &UploadTask) -> UploadOutcome {
        match self.try_upload(task).await {
            Ok(key) => UploadOutcome::Success { key },
            Err(cause) => UploadOutcome::Failure(UploadFailure {
                path: task.path.clone(),
                cause,
            }),
        }
    }

    async fn try_upload(&self, task: &UploadTask) -> Result<String, UploadError> {
        let file = File::open(&task.path).await.map_err(UploadError::Open)?;
        let content_length = file.metadata().await.map_err(UploadError::Metadata)?.len();

        let key = task.destination_key()?;
        let content_type = task.content_type();

        if self.cancel.is_cancelled() {
            return Err(UploadError::Cancelled);
        }

        debug!("Uploading {} as {} ({})", task.path.display(), key, content_type);
        self.store
            .put_object(PutObjectInput {
                bucket: self.bucket.to_string(),
                key: key.clone(),
                content_type: content_type.to_string(),
                content_length,
                body: file,
            })
            .await?;

        Ok(key)
    }

    /// Run one admitted task to completion: upload, give the slot back, then
    /// print the success line or hand the failure to the sink.
    ///
    /// Returns true on success.
    pub async fn process(
        self,
        task: UploadTask,
        permit: LimiterPermit,
        failures: FailureSender,
    ) -> bool {
        let outcome = self.upload(&task).await;
        permit.release();

        match outcome {
            UploadOutcome::Success { key } => {
                println!("{} {}", SUCCESS_LINE_PREFIX, key);
                true
            }
            UploadOutcome::Failure(failure) => {
                debug!("Upload of {} failed: {}", failure.path.display(), failure.cause);
                failures.report(failure);
                false
            }
        }
    }
}
