//! # dapp-pulse
//!
//! A fetch-normalize-query harness for crypto project metadata with a
//! dataset-grounded AI assistant.
//!
//! dapp-pulse pulls per-project JSON records from a metadata API,
//! reshapes them into a fixed canonical form, persists the dataset as a
//! JSON snapshot, and exposes filtering, keyword search, category
//! aggregation, CSV export, and a chat assistant over a CLI and a JSON
//! HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌────────────┐
//! │  Fetcher    │──▶│  Normalizer   │──▶│  Snapshot  │
//! │ HTTP per id │   │ total, typed │   │ JSON file  │
//! └─────────────┘   └──────────────┘   └─────┬──────┘
//!                                            │
//!                        ┌───────────────────┼──────────────┐
//!                        ▼                   ▼              ▼
//!                  ┌──────────┐        ┌──────────┐   ┌───────────┐
//!                  │   CLI    │        │   HTTP   │   │ Assistant │
//!                  │ (pulse)  │        │ (axum)   │   │  bridge   │
//!                  └──────────┘        └──────────┘   └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export DAPPRADAR_API_KEY=...
//! pulse sync                        # fetch and normalize the dataset
//! pulse search "defi" --status active
//! pulse categories                  # category → count table
//! pulse export --output projects.csv
//! pulse ask "Which projects run on polygon?"
//! pulse serve                       # start the dashboard JSON API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`fetch`] | Upstream API fetcher |
//! | [`normalize`] | Raw payload → canonical record |
//! | [`query`] | Status filter, keyword search, category counts |
//! | [`store`] | JSON snapshot persistence |
//! | [`sync`] | Fetch-and-normalize orchestration |
//! | [`assistant`] | Dataset-grounded chat bridge |
//! | [`export`] | CSV export |
//! | [`server`] | Dashboard HTTP server |

pub mod assistant;
pub mod config;
pub mod export;
pub mod fetch;
pub mod models;
pub mod normalize;
pub mod query;
pub mod server;
pub mod store;
pub mod sync;
