use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::BytesMut;
use futures::TryStreamExt;
use log::debug;
use rusoto_core::ByteStream;
use rusoto_s3::{PutObjectRequest, S3Client, S3};
use thiserror::Error;
use tokio::fs::File;
use tokio_util::codec::{BytesCodec, FramedRead};

#[cfg(test)]
use mockall::automock;

/// Everything needed for a single object write.
///
/// The body is the open source file; it is consumed by the store and closed
/// when the request is dropped.
#[derive(Debug)]
pub struct PutObjectInput {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub content_length: u64,
    pub body: File,
}

/// Failure reported by the storage service or while streaming the body.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage service rejected the request: {0}")]
    Service(String),

    #[error("failed to stream object body: {0}")]
    Io(#[from] io::Error),
}

/// The one storage capability the upload pipeline depends on.
///
/// Implementations are shared read-only across all workers, so they must be
/// safe to call concurrently without external locking.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `input.body` under `input.key` in `input.bucket`, replacing any
    /// existing object.
    async fn put_object(&self, input: PutObjectInput) -> Result<(), StoreError>;
}

/// [`ObjectStore`] backed by an S3-compatible service.
pub struct S3ObjectStore {
    client: Arc<S3Client>,
}

impl S3ObjectStore {
    pub fn new(client: Arc<S3Client>) -> Self {
        S3ObjectStore { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, input: PutObjectInput) -> Result<(), StoreError> {
        let PutObjectInput { bucket, key, content_type, content_length, body } = input;

        // Stream the file instead of buffering it
        let stream = FramedRead::new(body, BytesCodec::new()).map_ok(BytesMut::freeze);
        let request = PutObjectRequest {
            bucket,
            key,
            content_type: Some(content_type),
            content_length: Some(content_length as i64),
            body: Some(ByteStream::new_with_size(stream, content_length as usize)),
            ..Default::default()
        };

        debug!("PUT s3://{}/{} ({} bytes)", request.bucket, request.key, content_length);

        self.client
            .put_object(request)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Service(e.to_string()))
    }
}
