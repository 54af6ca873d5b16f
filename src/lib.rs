//! # bucket-uploader
//!
//! Uploads every regular file below a local directory to an S3-compatible
//! bucket, with a fixed upper bound on concurrent uploads.
//!
//! ## Overview
//!
//! A directory walk streams file paths through a small bounded channel. The
//! orchestrator admits each path through a concurrency limiter and hands it
//! to an upload worker. Failures are gathered in a shared sink and reported
//! only after every worker has finished, so the final report is complete.
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
//! let settings = UploadSettings::new("assets", Path::new("./public")).with_prefix("site");
//!
//! let mut orchestrator = Orchestrator::new(Arc::new(S3ObjectStore::new(client)), settings);
//! let report = orchestrator.run(CancellationToken::new()).await?;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`config`]: Layered configuration (defaults, YAML file, CLI/env)
//! - [`models`]: Upload tasks, outcomes and the run report
//! - [`upload`]: The bounded-concurrency pipeline
//! - [`cloud`]: Object storage boundary and its S3 implementation
//! - [`utils`]: Key derivation and content type inference
//! - [`constants`]: Application-wide constants

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Core data models and structures used throughout the application
pub mod models;

/// Key derivation and content type helpers
pub mod utils;

/// Object storage integration (S3-compatible)
pub mod cloud;

/// Configuration loading, merging and validation
pub mod config;

/// Directory walk, concurrency limiting, workers and orchestration
pub mod upload;

/// Application constants and configuration values
pub mod constants;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;
