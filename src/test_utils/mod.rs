//! Test utilities for bucket-uploader
//!
//! Common fixtures shared by the unit test modules.

#![cfg(test)]

use anyhow::Result;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

/// Creates a temporary directory that is automatically cleaned up
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file structure in a temporary directory.
///
/// Five files across three directory levels.
pub fn create_test_file_structure() -> Result<TempDir> {
    let temp_dir = create_temp_dir()?;
    let base_path = temp_dir.path();

    // Create directory structure
    fs::create_dir_all(base_path.join("dir1/subdir1"))?;
    fs::create_dir_all(base_path.join("dir2"))?;

    // Create test files
    fs::write(base_path.join("file1.txt"), b"Test content 1")?;
    fs::write(base_path.join("file2.log"), b"Test log content")?;
    fs::write(base_path.join("dir1/file3.txt"), b"Test content 3")?;
    fs::write(base_path.join("dir1/subdir1/file4.txt"), b"Test content 4")?;
    fs::write(base_path.join("dir2/file5.log"), b"Another log file")?;

    Ok(temp_dir)
}

/// Creates a test YAML configuration file
pub fn create_test_config() -> Result<NamedTempFile> {
    let config_content = r#"
access_key_id: "test-key"
secret_access_key: "test-secret"
bucket: "test-bucket"
folder: "/tmp/test"
prefix: "uploads"
workers: 2
"#;

    let mut file = NamedTempFile::new()?;
    file.write_all(config_content.as_bytes())?;
    file.flush()?;
    Ok(file)
}
