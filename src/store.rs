//! Snapshot persistence.
//!
//! The normalized snapshot is the sole source of truth for every
//! consumer: the query commands, the assistant, the export, and the
//! HTTP server all read it back from disk. It is overwritten wholesale
//! on each sync — there is no merge. The raw-fetch document sits next
//! to it for audit only; nothing reads it back.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::models::{Project, ProjectRow, RawRecord};

/// Write the normalized snapshot, replacing any previous one.
pub fn write_snapshot(path: &Path, projects: &[Project]) -> Result<()> {
    write_pretty_json(path, projects)
}

/// Write the unnormalized fetch responses for audit.
pub fn write_raw(path: &Path, records: &[RawRecord]) -> Result<()> {
    write_pretty_json(path, records)
}

/// Read the snapshot back as normalized records.
pub fn read_snapshot(path: &Path) -> Result<Vec<Project>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;

    let projects: Vec<Project> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot: {}", path.display()))?;

    Ok(projects)
}

/// Read the snapshot and project it into the flat table form.
pub fn read_rows(path: &Path) -> Result<Vec<ProjectRow>> {
    let projects = read_snapshot(path)?;
    Ok(projects.iter().map(Project::to_row).collect())
}

fn write_pretty_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write: {}", path.display()))?;

    Ok(())
}
