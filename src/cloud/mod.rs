//! Object storage integration.
//!
//! The upload pipeline only talks to the [`store::ObjectStore`] trait. The
//! S3 implementation streams each file body straight from disk through
//! rusoto, so memory use does not grow with file size.
//!
//! ## Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use bucket_uploader::cloud::client::create_s3_client;
//! use bucket_uploader::cloud::store::S3ObjectStore;
//!
//! # fn example() -> anyhow::Result<()> {
//! let client = create_s3_client("KEY", "SECRET", "auto", "https://fly.storage.tigris.dev")?;
//! let store = Arc::new(S3ObjectStore::new(client));
//! # Ok(())
//! # }
//! ```

/// S3 client construction from static credentials
pub mod client;

/// Storage boundary trait and its S3 implementation
pub mod store;
