//! Core data models used throughout dapp-pulse.
//!
//! These types represent the records that flow through the fetch →
//! normalize → query pipeline: the opaque upstream payload, the canonical
//! normalized project, and the flat row consumed by the query layer.

use serde::{Deserialize, Serialize};

/// Unmodified API response payload for one project identifier.
///
/// The upstream shape is not controlled by this crate; everything of
/// interest lives under the payload's `results` key and is extracted
/// with defaults by [`crate::normalize::normalize`].
pub type RawRecord = serde_json::Value;

/// Canonical normalized project record.
///
/// Every downstream consumer (query layer, assistant, export, server)
/// reads this shape from the persisted snapshot. Instances are created
/// only by the normalizer and superseded wholesale on each sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_name: String,
    pub categories: Vec<String>,
    pub description: Description,
    /// Invariant: always exactly one entry.
    pub requirements: Vec<Requirement>,
    pub rewards: Rewards,
    pub links: Links,
    /// Always `"active"` at creation time; no producer sets `"ended"`.
    pub status: String,
    /// Local wall-clock time of normalization, `YYYY-MM-DD HH:MM:SS`.
    pub last_updated: String,
}

/// Short and full project descriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    pub short: String,
    pub full: String,
}

/// Participation requirements for a project.
///
/// `task`, `difficulty`, and `deadline` are unpopulated placeholders:
/// they serialize as `null` and no current producer fills them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub chains: Vec<String>,
    pub balance: f64,
    pub task: Option<String>,
    pub difficulty: Option<String>,
    pub deadline: Option<String>,
}

/// Reward terms. Both fields are unpopulated placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rewards {
    pub amount: Option<f64>,
    pub distribution_date: Option<String>,
}

/// Project website and social links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Links {
    pub website: String,
    pub social: SocialLinks,
}

/// Social link URLs, empty string when the upstream payload has none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub twitter: String,
    pub telegram: String,
    pub discord: String,
}

/// One flat row of the in-memory project table.
///
/// Produced by [`Project::to_row`], which centralizes
/// the nested-to-flat projection in one place. The query layer operates
/// exclusively on slices of this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRow {
    pub project_name: String,
    pub categories: Vec<String>,
    pub short_description: String,
    pub full_description: String,
    pub website: String,
    pub twitter: String,
    pub telegram: String,
    pub discord: String,
    pub chains: Vec<String>,
    pub balance: f64,
    pub status: String,
    pub last_updated: String,
}
