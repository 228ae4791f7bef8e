//! Fetch-and-normalize orchestration.
//!
//! One sync cycle runs the whole pipeline explicitly: fetch raw records,
//! write the raw audit document, normalize, overwrite the snapshot.
//! Nothing here (or anywhere else in the crate) touches the network or
//! the filesystem as a side effect of being loaded — every step is a
//! function invoked by the CLI or the server.

use anyhow::{bail, Result};
use serde::Serialize;

use crate::config::Config;
use crate::fetch;
use crate::models::Project;
use crate::normalize;
use crate::store;

/// Outcome of one sync cycle (used by both the CLI and `POST /sync`).
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub requested: usize,
    pub fetched: usize,
    pub skipped: usize,
    pub last_updated: String,
}

/// Core sync function returning structured data (used by CLI and server).
///
/// When zero records come back, the existing snapshot is left untouched
/// and an error is returned instead — a failed refresh never wipes the
/// previous dataset.
pub async fn sync_projects(config: &Config, ids_override: Option<Vec<u64>>) -> Result<SyncReport> {
    let ids = ids_override.unwrap_or_else(|| config.api.project_ids.clone());
    if ids.is_empty() {
        bail!("No project ids configured. Set api.project_ids or pass --ids.");
    }

    let raw_records = fetch::fetch_projects(config, &ids).await?;
    if raw_records.is_empty() {
        bail!("No projects were fetched from the API.");
    }

    store::write_raw(&config.storage.raw_path, &raw_records)?;

    let projects: Vec<Project> = raw_records.iter().map(normalize::normalize).collect();
    store::write_snapshot(&config.storage.snapshot_path, &projects)?;

    let last_updated = projects
        .first()
        .map(|p| p.last_updated.clone())
        .unwrap_or_default();

    Ok(SyncReport {
        requested: ids.len(),
        fetched: raw_records.len(),
        skipped: ids.len() - raw_records.len(),
        last_updated,
    })
}

/// CLI entry point — runs a sync and prints the summary.
pub async fn run_sync(config: &Config, ids_override: Option<Vec<u64>>) -> Result<()> {
    let report = sync_projects(config, ids_override).await?;

    println!("sync dappradar");
    println!("  requested: {} ids", report.requested);
    println!("  fetched: {} projects", report.fetched);
    println!("  skipped: {}", report.skipped);
    println!("  snapshot: {}", config.storage.snapshot_path.display());
    println!("  last updated: {}", report.last_updated);
    println!("ok");

    Ok(())
}

/// Make sure a snapshot exists before a consumer command runs.
///
/// A missing snapshot surfaces an informational message and triggers a
/// full sync; an existing one is left as-is regardless of age.
pub async fn ensure_snapshot(config: &Config) -> Result<()> {
    if config.storage.snapshot_path.exists() {
        return Ok(());
    }

    println!("No data found. Fetching data...");
    run_sync(config, None).await
}

/// `pulse status` — report snapshot freshness.
pub fn run_status(config: &Config) -> Result<()> {
    let path = &config.storage.snapshot_path;

    if !path.exists() {
        println!(
            "No snapshot at {}. Run `pulse sync` to fetch data.",
            path.display()
        );
        return Ok(());
    }

    let projects = store::read_snapshot(path)?;
    let last_updated = projects
        .first()
        .map(|p| p.last_updated.as_str())
        .unwrap_or("unknown");

    println!("snapshot: {}", path.display());
    println!("  projects: {}", projects.len());
    println!("  last updated: {}", last_updated);

    Ok(())
}
