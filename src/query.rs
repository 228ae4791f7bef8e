//! Query operations over the flat project table.
//!
//! The core operations are pure: they take `&[ProjectRow]` slices and
//! return new collections. The CLI and the HTTP server both compose
//! them the same way — status filter first, then keyword search over
//! the survivors. The `run_*` entry points wrap the pure operations
//! with snapshot loading and printing for the CLI.

use anyhow::Result;
use std::collections::BTreeMap;

use crate::config::Config;
use crate::models::ProjectRow;
use crate::store;
use crate::sync;

/// Bucket label for rows whose category list is empty.
pub const UNCATEGORIZED: &str = "(uncategorized)";

/// CLI entry point — prints matching rows for `pulse search`.
pub async fn run_search(config: &Config, keyword: &str, status: Option<&str>) -> Result<()> {
    if keyword.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    sync::ensure_snapshot(config).await?;
    let mut rows = store::read_rows(&config.storage.snapshot_path)?;

    if let Some(status) = status {
        rows = filter_by_status(status, &rows);
    }
    let rows = search(keyword, &rows);

    if rows.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, row) in rows.iter().enumerate() {
        print_row(i + 1, row);
    }

    Ok(())
}

/// CLI entry point — prints the category table for `pulse categories`.
pub async fn run_categories(config: &Config) -> Result<()> {
    sync::ensure_snapshot(config).await?;
    let rows = store::read_rows(&config.storage.snapshot_path)?;

    let counts = group_by_category(&rows);
    if counts.is_empty() {
        println!("No projects.");
        return Ok(());
    }

    println!("{:<24} PROJECTS", "CATEGORY");
    for (category, count) in &counts {
        println!("{:<24} {}", category, count);
    }

    Ok(())
}

fn print_row(index: usize, row: &ProjectRow) {
    println!("{}. {} [{}]", index, row.project_name, row.status);
    if !row.categories.is_empty() {
        println!("    categories: {}", row.categories.join(", "));
    }
    if !row.chains.is_empty() {
        println!("    chains: {}", row.chains.join(", "));
    }
    println!("    balance: {}", row.balance);
    if !row.website.is_empty() {
        println!("    website: {}", row.website);
    }
    println!("    updated: {}", row.last_updated);
    println!();
}

/// Equality filter on the `status` column. Preserves row order.
pub fn filter_by_status(status: &str, rows: &[ProjectRow]) -> Vec<ProjectRow> {
    rows.iter()
        .filter(|row| row.status == status)
        .cloned()
        .collect()
}

/// Case-insensitive substring search across every text field.
///
/// A row matches when any of its string columns contains the keyword.
/// List-valued columns (`categories`, `chains`) and numeric columns
/// never match. Preserves row order.
pub fn search(keyword: &str, rows: &[ProjectRow]) -> Vec<ProjectRow> {
    let needle = keyword.to_lowercase();
    rows.iter()
        .filter(|row| row_matches(row, &needle))
        .cloned()
        .collect()
}

fn row_matches(row: &ProjectRow, needle: &str) -> bool {
    text_fields(row)
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// The columns `search` looks at, in table order.
fn text_fields(row: &ProjectRow) -> [&str; 9] {
    [
        &row.project_name,
        &row.short_description,
        &row.full_description,
        &row.website,
        &row.twitter,
        &row.telegram,
        &row.discord,
        &row.status,
        &row.last_updated,
    ]
}

/// Count projects per category.
///
/// A row carrying N categories contributes one count to each of the N
/// groups; a row with no categories counts once under [`UNCATEGORIZED`]
/// so it never vanishes from the totals. The map iterates in category
/// name order, which keeps chart output deterministic.
pub fn group_by_category(rows: &[ProjectRow]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for row in rows {
        if row.categories.is_empty() {
            *counts.entry(UNCATEGORIZED.to_string()).or_insert(0) += 1;
        } else {
            for category in &row.categories {
                *counts.entry(category.clone()).or_insert(0) += 1;
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    fn make_row(name: &str, status: &str, categories: &[&str]) -> ProjectRow {
        ProjectRow {
            project_name: name.to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            short_description: String::new(),
            full_description: String::new(),
            website: String::new(),
            twitter: String::new(),
            telegram: String::new(),
            discord: String::new(),
            chains: Vec::new(),
            balance: 0.0,
            status: status.to_string(),
            last_updated: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_filter_by_status_preserves_order() {
        let rows = vec![
            make_row("a", "active", &[]),
            make_row("b", "active", &[]),
            make_row("c", "ended", &[]),
        ];

        let active = filter_by_status("active", &rows);
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].project_name, "a");
        assert_eq!(active[1].project_name, "b");
    }

    #[test]
    fn test_filter_ended_empty_over_normalized_rows() {
        // The normalizer only ever stamps "active", so an "ended" filter
        // over its output is always empty.
        let rows: Vec<ProjectRow> = [
            json!({"results": {"name": "Foo"}}),
            json!({"results": {"name": "Bar"}}),
        ]
        .iter()
        .map(|raw| normalize(raw).to_row())
        .collect();

        assert!(filter_by_status("ended", &rows).is_empty());
        assert_eq!(filter_by_status("active", &rows).len(), 2);
    }

    #[test]
    fn test_search_case_insensitive() {
        let mut row = make_row("Bitcoin Bridge", "active", &[]);
        row.short_description = "BTC transfers".to_string();
        let rows = vec![row, make_row("other", "active", &[])];

        let upper = search("BTC", &rows);
        let lower = search("btc", &rows);
        assert_eq!(upper, lower);
        assert_eq!(upper.len(), 1);
        assert_eq!(upper[0].project_name, "Bitcoin Bridge");
    }

    #[test]
    fn test_search_spans_all_text_columns() {
        let mut by_site = make_row("a", "active", &[]);
        by_site.website = "https://alpha.example".to_string();
        let mut by_social = make_row("b", "active", &[]);
        by_social.discord = "https://discord.gg/alpha".to_string();
        let rows = vec![by_site, by_social, make_row("c", "active", &[])];

        let hits = search("alpha", &rows);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_search_ignores_list_columns() {
        // Category and chain lists are not text columns; a keyword that
        // appears only there finds nothing.
        let mut row = make_row("plain", "active", &["GameFi"]);
        row.chains = vec!["solana".to_string()];
        let rows = vec![row];

        assert!(search("gamefi", &rows).is_empty());
        assert!(search("solana", &rows).is_empty());
    }

    #[test]
    fn test_search_empty_keyword_matches_everything() {
        let rows = vec![make_row("a", "active", &[]), make_row("b", "active", &[])];
        assert_eq!(search("", &rows).len(), 2);
    }

    #[test]
    fn test_group_by_category_counts_each_membership() {
        let rows = vec![
            make_row("a", "active", &["DeFi", "NFT"]),
            make_row("b", "active", &["DeFi"]),
            make_row("c", "active", &[]),
        ];

        let counts = group_by_category(&rows);
        assert_eq!(counts.get("DeFi"), Some(&2));
        assert_eq!(counts.get("NFT"), Some(&1));
        assert_eq!(counts.get(UNCATEGORIZED), Some(&1));
    }

    #[test]
    fn test_group_by_category_total_accounts_for_every_row() {
        let rows = vec![
            make_row("a", "active", &["DeFi", "NFT", "Gaming"]),
            make_row("b", "active", &["DeFi"]),
            make_row("c", "active", &[]),
            make_row("d", "active", &[]),
        ];

        let expected: usize = rows.iter().map(|r| r.categories.len().max(1)).sum();
        let total: usize = group_by_category(&rows).values().sum();
        assert_eq!(total, expected);
    }
}
