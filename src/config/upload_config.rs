use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Args;
use crate::config::env_vars::expand_env_vars;
use crate::constants::{
    DEFAULT_ENDPOINT, DEFAULT_REGION, DEFAULT_WORKERS, ENV_ACCESS_KEY_ID, ENV_SECRET_ACCESS_KEY,
};

/// Problems that make a run impossible before any I/O happens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required parameters: {}", .0.join(", "))]
    MissingRequired(Vec<&'static str>),

    #[error("--workers must be a positive integer")]
    ZeroWorkers,
}

/// Every option the uploader recognizes.
///
/// Values come from, in increasing priority: defaults, a YAML file, then
/// command-line flags and their environment variables.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub endpoint: String,
    pub bucket: String,
    pub folder: String,
    pub prefix: String,
    pub workers: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            access_key_id: String::new(),
            secret_access_key: String::new(),
            region: DEFAULT_REGION.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            bucket: String::new(),
            folder: String::new(),
            prefix: String::new(),
            workers: DEFAULT_WORKERS,
        }
    }
}

// Keeps the secret out of debug logs
impl fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = if self.secret_access_key.is_empty() { "" } else { "<REDACTED>" };
        f.debug_struct("UploadConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &secret)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("folder", &self.folder)
            .field("prefix", &self.prefix)
            .field("workers", &self.workers)
            .finish()
    }
}

impl UploadConfig {
    /// Load configuration from a YAML file, expanding `$VAR`/`${VAR}` in
    /// every string value.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let mut config: UploadConfig = serde_yaml::from_str(&content)
            .context("Failed to parse YAML config")?;
        config.expand_environment_variables();

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Starting point written by `init-config`. Credentials are left as
    /// environment references so the file can be committed.
    pub fn template() -> Self {
        UploadConfig {
            access_key_id: format!("${{{}}}", ENV_ACCESS_KEY_ID),
            secret_access_key: format!("${{{}}}", ENV_SECRET_ACCESS_KEY),
            bucket: "my-bucket".to_string(),
            folder: "./public".to_string(),
            ..Default::default()
        }
    }

    fn expand_environment_variables(&mut self) {
        for value in [
            &mut self.access_key_id,
            &mut self.secret_access_key,
            &mut self.region,
            &mut self.endpoint,
            &mut self.bucket,
            &mut self.folder,
            &mut self.prefix,
        ] {
            if value.contains('$') {
                *value = expand_env_vars(value);
            }
        }
    }

    /// Apply every option given on the command line (or through its
    /// environment variable) on top of this configuration.
    pub fn merge_args(&mut self, args: &Args) {
        let overrides = [
            (&mut self.access_key_id, &args.access_key_id),
            (&mut self.secret_access_key, &args.secret_access_key),
            (&mut self.region, &args.region),
            (&mut self.endpoint, &args.endpoint),
            (&mut self.bucket, &args.bucket),
            (&mut self.folder, &args.folder),
            (&mut self.prefix, &args.prefix),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value.clone();
            }
        }
        if let Some(workers) = args.workers {
            self.workers = workers;
        }
    }

    /// Check that a run can start. Reports every missing option at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("--access-key-id", &self.access_key_id),
            ("--secret-access-key", &self.secret_access_key),
            ("--bucket", &self.bucket),
            ("--folder", &self.folder),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(flag, _)| *flag)
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingRequired(missing));
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }
}

/// Build the effective configuration: optional YAML file, then CLI/env.
pub fn load_config(args: &Args) -> Result<UploadConfig> {
    let mut config = match &args.config {
        Some(path) => UploadConfig::from_yaml_file(path)?,
        None => UploadConfig::default(),
    };
    config.merge_args(args);
    debug!("Effective configuration: {:?}", config);
    Ok(config)
}
