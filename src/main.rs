use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use bucket_uploader::cli::{Args, Commands};
use bucket_uploader::cloud::client::create_s3_client;
use bucket_uploader::cloud::store::S3ObjectStore;
use bucket_uploader::config::{load_config, UploadConfig};
use bucket_uploader::models::RunReport;
use bucket_uploader::upload::orchestrator::{Orchestrator, UploadSettings};

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    // Handle subcommands
    if let Some(cmd) = &args.command {
        return handle_subcommand(cmd);
    }

    // Load configuration and check it before touching the network
    let config = load_config(&args)?;
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let report = run_upload(&config)?;
    if !report.is_success() {
        process::exit(1);
    }
    Ok(())
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ).context("Failed to initialize logger")?;
    Ok(())
}

/// Handle subcommands (init-config)
fn handle_subcommand(cmd: &Commands) -> Result<()> {
    match cmd {
        Commands::InitConfig { path } => {
            info!("Creating configuration template at {}", path.display());
            UploadConfig::template().save_to_yaml_file(path)?;
            info!("Configuration created successfully");
            Ok(())
        }
    }
}

/// Build the storage client and run the pipeline to completion
fn run_upload(config: &UploadConfig) -> Result<RunReport> {
    let runtime = Runtime::new().context("Failed to create Tokio runtime")?;

    runtime.block_on(async {
        let client = create_s3_client(
            &config.access_key_id,
            &config.secret_access_key,
            &config.region,
            &config.endpoint,
        )?;
        let store = Arc::new(S3ObjectStore::new(client));

        let cancel = CancellationToken::new();
        let on_signal = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received, waiting for in-flight uploads");
                    on_signal.cancel();
                }
                Err(e) => error!("Failed to listen for interrupt signal: {}", e),
            }
        });

        let settings = UploadSettings::from(config);
        debug!("Upload settings: {:?}", settings);
        let mut orchestrator = Orchestrator::new(store, settings);
        orchestrator.run(cancel).await
    })
}
