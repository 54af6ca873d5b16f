//! Pure helpers shared by the upload pipeline.
//!
//! - **keys**: destination key derivation with forward-slash normalization
//! - **content_type**: extension based MIME type inference

/// Destination key derivation
pub mod keys;

/// Content type inference
pub mod content_type;
