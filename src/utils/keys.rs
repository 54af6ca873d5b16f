//! Destination key derivation.
//!
//! Object keys always use `/` as separator, whatever the host path
//! convention, and never start or end with one.

use std::path::Path;

/// Join `prefix` and `relative` into an object key.
///
/// Both parts go through [`normalize_key`], so a prefix of `"up"`, `"up/"`
/// or `"/up"` gives the same result. An empty prefix yields the bare
/// relative path.
///
/// Returns `None` when `relative` is not valid UTF-8, since a lossy
/// conversion could map two different files to one key.
pub fn destination_key(prefix: &str, relative: &Path) -> Option<String> {
    let relative = relative.to_str()?;
    Some(normalize_key(&format!("{}/{}", prefix, relative)))
}

/// Clean a slash-separated key: backslashes become separators, empty and
/// `.` segments are dropped and `..` removes the previous segment.
pub fn normalize_key(raw: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in raw.split(|c| c == '/' || c == '\\') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}
