//! Global constants for the bucket uploader.
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make configuration changes easier.

// Storage service defaults
/// Default storage region identifier
pub const DEFAULT_REGION: &str = "auto";

/// Default storage API endpoint (Tigris on Fly.io)
pub const DEFAULT_ENDPOINT: &str = "https://fly.storage.tigris.dev";

// Pipeline tuning
/// Default number of concurrent upload workers
pub const DEFAULT_WORKERS: usize = 10;

/// Capacity of the channel between the directory walk and the orchestrator.
/// Kept small so memory stays constant in the number of files.
pub const PATH_CHANNEL_CAPACITY: usize = 16;

// Content type
/// Content type used when the extension is unknown or missing
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

// Console contract
/// Prefix of the line printed for every successful upload
pub const SUCCESS_LINE_PREFIX: &str = "File successfully uploaded:";

/// Final line printed once every worker has finished and failures are reported
pub const COMPLETION_MARKER: &str = "Upload completed.";

// Default file names
pub const DEFAULT_CONFIG_NAME: &str = "uploader.yaml";

// Environment variables recognized for credentials and endpoint
pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_ENDPOINT: &str = "AWS_ENDPOINT_URL_S3";
