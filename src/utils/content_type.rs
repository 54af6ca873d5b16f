//! Content type inference from file extensions.

use std::path::Path;

use crate::constants::DEFAULT_CONTENT_TYPE;

/// Guess the MIME type of `path` from its extension, falling back to
/// `application/octet-stream` for unknown or missing extensions.
pub fn infer(path: &Path) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
