//! CSV export of the project table.
//!
//! Produces the downloadable filtered-projects file: one CSV row per
//! project, list columns joined with `"; "`. Writes to a file when an
//! output path is given, otherwise to stdout for piping.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::models::ProjectRow;
use crate::query;
use crate::store;
use crate::sync;

const HEADERS: [&str; 12] = [
    "project_name",
    "categories",
    "short_description",
    "full_description",
    "website",
    "twitter",
    "telegram",
    "discord",
    "chains",
    "balance",
    "status",
    "last_updated",
];

/// Render rows as a CSV document (header line included).
pub fn to_csv(rows: &[ProjectRow]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new().from_writer(vec![]);
    wtr.write_record(HEADERS)?;

    for row in rows {
        let record = [
            row.project_name.clone(),
            row.categories.join("; "),
            row.short_description.clone(),
            row.full_description.clone(),
            row.website.clone(),
            row.twitter.clone(),
            row.telegram.clone(),
            row.discord.clone(),
            row.chains.join("; "),
            row.balance.to_string(),
            row.status.clone(),
            row.last_updated.clone(),
        ];
        wtr.write_record(&record)?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

/// Export the (optionally filtered) project table as CSV.
///
/// If `output` is `Some`, writes to that file path. Otherwise writes
/// to stdout for piping.
pub async fn run_export(
    config: &Config,
    status: Option<&str>,
    keyword: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    sync::ensure_snapshot(config).await?;
    let mut rows = store::read_rows(&config.storage.snapshot_path)?;

    if let Some(status) = status {
        rows = query::filter_by_status(status, &rows);
    }
    if let Some(keyword) = keyword {
        if !keyword.trim().is_empty() {
            rows = query::search(keyword, &rows);
        }
    }

    let data = to_csv(&rows)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &data)?;
            eprintln!("Exported {} projects to {}", rows.len(), path.display());
        }
        None => {
            print!("{}", data);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    #[test]
    fn test_to_csv_header_and_rows() {
        let rows: Vec<ProjectRow> = vec![normalize(&json!({
            "results": {
                "name": "Foo",
                "categories": ["DeFi", "NFT"],
                "chains": ["ethereum"],
                "metrics": {"balance": 2.5}
            }
        }))
        .to_row()];

        let csv_text = to_csv(&rows).unwrap();
        let mut lines = csv_text.lines();

        assert_eq!(lines.next().unwrap().split(',').next(), Some("project_name"));
        let data_line = lines.next().unwrap();
        assert!(data_line.starts_with("Foo,"));
        assert!(data_line.contains("DeFi; NFT"));
        assert!(data_line.contains("ethereum"));
        assert!(data_line.contains("2.5"));
    }

    #[test]
    fn test_to_csv_empty_table_is_header_only() {
        let csv_text = to_csv(&[]).unwrap();
        assert_eq!(csv_text.lines().count(), 1);
    }
}
