//! The bounded-concurrency upload pipeline.
//!
//! ## Components
//!
//! - **walker**: recursive directory walk streaming file paths with backpressure
//! - **limiter**: counting admission gate for in-flight uploads
//! - **worker**: uploads one file and reports its outcome
//! - **error_sink**: unbounded many-writer collection of failures
//! - **orchestrator**: runs the whole pipeline and produces the final report
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use bucket_uploader::cloud::client::create_s3_client;
//! use bucket_uploader::cloud::store::S3ObjectStore;
//! use bucket_uploader::upload::orchestrator::{Orchestrator, UploadSettings};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = create_s3_client("KEY", "SECRET", "auto", "https://fly.storage.tigris.dev")?;
//! let settings = UploadSettings::new("my-bucket", Path::new("./site"))
//!     .with_prefix("releases/v1")
//!     .with_workers(16);
//!
//! let mut orchestrator = Orchestrator::new(Arc::new(S3ObjectStore::new(client)), settings);
//! let report = orchestrator.run(CancellationToken::new()).await?;
//! println!("{} uploaded, {} failed", report.uploaded, report.failed());
//! # Ok(())
//! # }
//! ```

pub mod error_sink;
pub mod limiter;
pub mod orchestrator;
pub mod walker;
pub mod worker;
