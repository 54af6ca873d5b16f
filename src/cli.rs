use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_CONFIG_NAME, ENV_ACCESS_KEY_ID, ENV_ENDPOINT, ENV_REGION, ENV_SECRET_ACCESS_KEY,
};

/// Command-line arguments for the bucket uploader.
///
/// Every option is optional here so that a YAML config file can supply it.
/// Required options are checked after the file and the command line are
/// merged.
#[derive(Parser, Debug)]
#[clap(
    name = "bucket-uploader",
    about = "Upload a directory tree to an S3-compatible bucket"
)]
pub struct Args {
    /// Access key ID for the storage service
    #[clap(long, env = ENV_ACCESS_KEY_ID, hide_env_values = true)]
    pub access_key_id: Option<String>,

    /// Secret access key for the storage service
    #[clap(long, env = ENV_SECRET_ACCESS_KEY, hide_env_values = true)]
    pub secret_access_key: Option<String>,

    /// Region identifier (default: auto)
    #[clap(long, env = ENV_REGION)]
    pub region: Option<String>,

    /// Storage API endpoint URL (default: https://fly.storage.tigris.dev)
    #[clap(long, env = ENV_ENDPOINT)]
    pub endpoint: Option<String>,

    /// Destination bucket name
    #[clap(short, long)]
    pub bucket: Option<String>,

    /// Local directory to upload
    #[clap(short, long)]
    pub folder: Option<String>,

    /// Key prefix prepended to every uploaded object
    #[clap(short, long)]
    pub prefix: Option<String>,

    /// Maximum number of concurrent uploads (default: 10)
    #[clap(short, long)]
    pub workers: Option<usize>,

    /// Path to configuration YAML file
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the uploader.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a configuration file template
    InitConfig {
        /// Path to output configuration file
        #[clap(default_value = DEFAULT_CONFIG_NAME)]
        path: PathBuf,
    },
}
