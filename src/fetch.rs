//! Upstream API fetcher.
//!
//! Retrieves one raw JSON record per project identifier from the
//! metadata provider. Requests are issued one at a time, in input
//! order; a failed identifier is reported on stderr and dropped from
//! the output, never retried and never null-padded.

use anyhow::{bail, Result};
use std::time::Duration;

use crate::config::Config;
use crate::models::RawRecord;

/// Environment variable holding the data provider API key.
pub const API_KEY_VAR: &str = "DAPPRADAR_API_KEY";

/// Fetch raw records for the given project ids, sequentially.
///
/// Each id issues a single `GET {base_url}{id}` with the `X-API-KEY`
/// header. Output order follows input order, with gaps where a fetch
/// failed.
///
/// # Errors
///
/// Only configuration-level problems (missing API key, client build
/// failure) surface as errors; per-id failures degrade to a shorter
/// result sequence.
pub async fn fetch_projects(config: &Config, ids: &[u64]) -> Result<Vec<RawRecord>> {
    let api_key = std::env::var(API_KEY_VAR)
        .map_err(|_| anyhow::anyhow!("{} environment variable not set", API_KEY_VAR))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.api.timeout_secs))
        .build()?;

    let mut records = Vec::with_capacity(ids.len());

    for &id in ids {
        match fetch_one(&client, &config.api.base_url, &api_key, id).await {
            Ok(record) => records.push(record),
            Err(e) => eprintln!("fetch {}: {}", id, e),
        }
    }

    Ok(records)
}

async fn fetch_one(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    id: u64,
) -> Result<RawRecord> {
    let url = format!("{}{}", base_url, id);

    let response = client
        .get(&url)
        .header("accept", "application/json")
        .header("X-API-KEY", api_key)
        .send()
        .await?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        bail!("HTTP {}", status.as_u16());
    }

    Ok(response.json().await?)
}
