use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;
use rusoto_core::{HttpClient, Region};
use rusoto_credential::StaticProvider;
use rusoto_s3::S3Client;

/// Build the region used for every request.
///
/// S3-compatible providers are addressed through their own endpoint, so the
/// region name is passed through as-is instead of being parsed as an AWS region.
pub fn custom_region(region_name: &str, endpoint: &str) -> Region {
    Region::Custom {
        name: region_name.to_string(),
        endpoint: endpoint.trim_end_matches('/').to_string(),
    }
}

/// Create an S3 client authenticated with a static access key pair.
pub fn create_s3_client(
    access_key_id: &str,
    secret_access_key: &str,
    region_name: &str,
    endpoint: &str,
) -> Result<Arc<S3Client>> {
    let region = custom_region(region_name, endpoint);
    debug!("Creating S3 client for region '{}' at {}", region_name, endpoint);

    let credentials = StaticProvider::new_minimal(
        access_key_id.to_string(),
        secret_access_key.to_string(),
    );
    let http_client = HttpClient::new().context("Failed to create HTTP client")?;

    Ok(Arc::new(S3Client::new_with(http_client, credentials, region)))
}
