//! Raw payload normalization.
//!
//! Converts one opaque upstream payload into the canonical [`Project`]
//! shape. The conversion is total: every missing or mistyped field
//! resolves to a literal default, so any JSON value (including `{}` and
//! non-objects) produces a well-formed record.

use chrono::Local;
use serde_json::Value;

use crate::models::{
    Description, Links, Project, ProjectRow, RawRecord, Requirement, Rewards, SocialLinks,
};

/// Wall-clock format stamped into `last_updated`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Normalize one raw API payload into a [`Project`].
///
/// Reads the payload's `results` object (treated as empty when absent),
/// extracts fields by fixed key names with literal defaults (`""`, `[]`,
/// `0`), resolves each social URL to the first matching `socialLinks`
/// entry, and stamps `status = "active"` plus the current local time.
pub fn normalize(raw: &RawRecord) -> Project {
    let empty = Value::Object(Default::default());
    let results = raw.get("results").unwrap_or(&empty);

    Project {
        project_name: str_field(results, "name"),
        categories: str_list(results, "categories"),
        description: Description {
            short: str_field(results, "description"),
            full: str_field(results, "fullDescription"),
        },
        requirements: vec![Requirement {
            chains: str_list(results, "chains"),
            balance: results
                .get("metrics")
                .and_then(|metrics| metrics.get("balance"))
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
            task: None,
            difficulty: None,
            deadline: None,
        }],
        rewards: Rewards {
            amount: None,
            distribution_date: None,
        },
        links: Links {
            website: str_field(results, "website"),
            social: SocialLinks {
                twitter: social_url(results, "twitter"),
                telegram: social_url(results, "telegram"),
                discord: social_url(results, "discord"),
            },
        },
        status: "active".to_string(),
        last_updated: Local::now().format(TIMESTAMP_FORMAT).to_string(),
    }
}

fn str_field(results: &Value, key: &str) -> String {
    results
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn str_list(results: &Value, key: &str) -> Vec<String> {
    results
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// First `socialLinks` entry whose `type` matches, empty string if none.
fn social_url(results: &Value, kind: &str) -> String {
    results
        .get("socialLinks")
        .and_then(Value::as_array)
        .and_then(|links| {
            links
                .iter()
                .find(|link| link.get("type").and_then(Value::as_str) == Some(kind))
        })
        .and_then(|link| link.get("url"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

impl Project {
    /// Flatten into the tabular row consumed by the query layer.
    ///
    /// All nested-to-flat default policy lives here: even a hand-edited
    /// snapshot with an empty `requirements` list projects to a usable row.
    pub fn to_row(&self) -> ProjectRow {
        let requirement = self.requirements.first();

        ProjectRow {
            project_name: self.project_name.clone(),
            categories: self.categories.clone(),
            short_description: self.description.short.clone(),
            full_description: self.description.full.clone(),
            website: self.links.website.clone(),
            twitter: self.links.social.twitter.clone(),
            telegram: self.links.social.telegram.clone(),
            discord: self.links.social.discord.clone(),
            chains: requirement.map(|r| r.chains.clone()).unwrap_or_default(),
            balance: requirement.map(|r| r.balance).unwrap_or(0.0),
            status: self.status.clone(),
            last_updated: self.last_updated.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use serde_json::json;

    #[test]
    fn test_normalize_empty_object() {
        let project = normalize(&json!({}));
        assert_eq!(project.project_name, "");
        assert!(project.categories.is_empty());
        assert_eq!(project.description.short, "");
        assert_eq!(project.description.full, "");
        assert_eq!(project.links.website, "");
        assert_eq!(project.links.social.twitter, "");
        assert_eq!(project.requirements.len(), 1);
        assert!(project.requirements[0].chains.is_empty());
        assert_eq!(project.requirements[0].balance, 0.0);
        assert_eq!(project.status, "active");
    }

    #[test]
    fn test_normalize_is_total_for_non_objects() {
        // Anything that isn't a mapping still yields a well-formed record.
        for raw in [json!(null), json!(42), json!("text"), json!([1, 2, 3])] {
            let project = normalize(&raw);
            assert_eq!(project.requirements.len(), 1);
            assert_eq!(project.status, "active");
        }
    }

    #[test]
    fn test_normalize_full_payload() {
        let raw = json!({
            "results": {
                "name": "Foo",
                "categories": ["DeFi", "NFT"],
                "description": "short text",
                "fullDescription": "long text",
                "chains": ["ethereum", "polygon"],
                "metrics": {"balance": 1234.5},
                "website": "https://foo.example",
                "socialLinks": [
                    {"type": "twitter", "url": "http://x"},
                    {"type": "telegram", "url": "http://t"}
                ]
            }
        });

        let project = normalize(&raw);
        assert_eq!(project.project_name, "Foo");
        assert_eq!(project.categories, vec!["DeFi", "NFT"]);
        assert_eq!(project.description.short, "short text");
        assert_eq!(project.description.full, "long text");
        assert_eq!(project.links.social.twitter, "http://x");
        assert_eq!(project.links.social.telegram, "http://t");
        assert_eq!(project.links.social.discord, "");
        assert_eq!(project.requirements[0].chains, vec!["ethereum", "polygon"]);
        assert_eq!(project.requirements[0].balance, 1234.5);
    }

    #[test]
    fn test_social_url_first_match_wins() {
        let raw = json!({
            "results": {
                "socialLinks": [
                    {"type": "twitter", "url": "http://first"},
                    {"type": "twitter", "url": "http://second"}
                ]
            }
        });
        let project = normalize(&raw);
        assert_eq!(project.links.social.twitter, "http://first");
    }

    #[test]
    fn test_social_entry_without_url_defaults_empty() {
        let raw = json!({
            "results": {
                "socialLinks": [{"type": "discord"}]
            }
        });
        let project = normalize(&raw);
        assert_eq!(project.links.social.discord, "");
    }

    #[test]
    fn test_placeholders_stay_unset() {
        let project = normalize(&json!({"results": {"name": "Bar"}}));
        let requirement = &project.requirements[0];
        assert!(requirement.task.is_none());
        assert!(requirement.difficulty.is_none());
        assert!(requirement.deadline.is_none());
        assert!(project.rewards.amount.is_none());
        assert!(project.rewards.distribution_date.is_none());
    }

    #[test]
    fn test_last_updated_matches_format() {
        let project = normalize(&json!({}));
        assert!(
            NaiveDateTime::parse_from_str(&project.last_updated, TIMESTAMP_FORMAT).is_ok(),
            "unexpected stamp: {}",
            project.last_updated
        );
    }

    #[test]
    fn test_to_row_flattens_nested_fields() {
        let raw = json!({
            "results": {
                "name": "Foo",
                "description": "s",
                "fullDescription": "f",
                "chains": ["base"],
                "metrics": {"balance": 7.0},
                "website": "https://foo.example",
                "socialLinks": [{"type": "discord", "url": "http://d"}]
            }
        });
        let row = normalize(&raw).to_row();

        assert_eq!(row.project_name, "Foo");
        assert_eq!(row.short_description, "s");
        assert_eq!(row.full_description, "f");
        assert_eq!(row.website, "https://foo.example");
        assert_eq!(row.discord, "http://d");
        assert_eq!(row.twitter, "");
        assert_eq!(row.chains, vec!["base"]);
        assert_eq!(row.balance, 7.0);
        assert_eq!(row.status, "active");
    }

    #[test]
    fn test_to_row_tolerates_missing_requirement() {
        let mut project = normalize(&json!({}));
        project.requirements.clear();

        let row = project.to_row();
        assert!(row.chains.is_empty());
        assert_eq!(row.balance, 0.0);
    }
}
