//! # dapp-pulse CLI (`pulse`)
//!
//! The `pulse` binary is the primary interface for dapp-pulse. It
//! provides commands for fetching and normalizing project metadata,
//! querying the snapshot, exporting it, asking the assistant, and
//! starting the dashboard HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! pulse --config ./config/pulse.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pulse sync` | Fetch configured project ids and rewrite the snapshot |
//! | `pulse status` | Report snapshot freshness |
//! | `pulse search "<keyword>"` | Search the project table |
//! | `pulse categories` | Category → project count table |
//! | `pulse ask "<question>"` | Ask the assistant about the dataset |
//! | `pulse export` | Write the (filtered) table as CSV |
//! | `pulse serve` | Start the dashboard JSON API |
//!
//! ## Examples
//!
//! ```bash
//! # Fetch a custom id set instead of the configured one
//! pulse sync --ids 3,20,17
//!
//! # Keyword search, restricted to active projects
//! pulse search "bridge" --status active
//!
//! # Pipe the active projects as CSV
//! pulse export --status active > active.csv
//! ```

mod assistant;
mod config;
mod export;
mod fetch;
mod models;
mod normalize;
mod query;
mod server;
mod store;
mod sync;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dapp-pulse CLI — fetch, normalize, query, and ask about crypto
/// project metadata.
///
/// All commands accept a `--config` flag pointing to a TOML
/// configuration file. See `config/pulse.example.toml` for a full
/// example. Secrets are read from the environment: `DAPPRADAR_API_KEY`
/// for the metadata provider and `OPENAI_API_KEY` for the assistant.
#[derive(Parser)]
#[command(
    name = "pulse",
    about = "dapp-pulse — a fetch-normalize-query harness for crypto project metadata",
    version,
    long_about = "dapp-pulse pulls per-project JSON records from a metadata API, reshapes \
    them into a fixed canonical form, persists the dataset as a JSON snapshot, and exposes \
    filtering, search, category aggregation, CSV export, and a dataset-grounded chat \
    assistant via a CLI and a JSON HTTP API."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/pulse.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Fetch project metadata and rewrite the snapshot.
    ///
    /// Issues one request per project id, sequentially, skipping ids
    /// that fail. Writes the raw responses for audit and the normalized
    /// snapshot that every other command reads. The previous snapshot
    /// is replaced wholesale — unless nothing was fetched, in which
    /// case it is left untouched.
    Sync {
        /// Override the configured project ids (comma-separated).
        #[arg(long, value_delimiter = ',')]
        ids: Option<Vec<u64>>,
    },

    /// Report snapshot freshness.
    ///
    /// Prints the snapshot location, record count, and the
    /// `last_updated` stamp of the first record.
    Status,

    /// Search the project table by keyword.
    ///
    /// Case-insensitive substring match across every text column.
    /// Fetches data first if no snapshot exists yet.
    Search {
        /// The keyword to search for.
        keyword: String,

        /// Only consider projects with this status (e.g. `active`).
        #[arg(long)]
        status: Option<String>,
    },

    /// Show the category → project count table.
    ///
    /// A project carrying several categories counts once per category;
    /// projects without categories are grouped under `(uncategorized)`.
    Categories,

    /// Ask the assistant a question about the dataset.
    ///
    /// Sends the question together with the full serialized snapshot to
    /// the configured chat provider (temperature 0, no conversation
    /// memory). Failures are printed as the answer, never as a crash.
    Ask {
        /// The question to ask.
        question: String,
    },

    /// Write the project table as CSV.
    ///
    /// Optionally filtered by status and keyword; writes to stdout
    /// unless `--output` is given.
    Export {
        /// Only include projects with this status.
        #[arg(long)]
        status: Option<String>,

        /// Only include projects matching this keyword.
        #[arg(long)]
        q: Option<String>,

        /// Output file path (defaults to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Start the dashboard JSON API.
    ///
    /// Binds to the address configured in `[server].bind` and serves
    /// the project table, category counts, sync trigger, and assistant.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Sync { ids } => {
            sync::run_sync(&cfg, ids).await?;
        }
        Commands::Status => {
            sync::run_status(&cfg)?;
        }
        Commands::Search { keyword, status } => {
            query::run_search(&cfg, &keyword, status.as_deref()).await?;
        }
        Commands::Categories => {
            query::run_categories(&cfg).await?;
        }
        Commands::Ask { question } => {
            let answer = assistant::ask(&cfg, &question).await;
            println!("{}", answer);
        }
        Commands::Export { status, q, output } => {
            export::run_export(&cfg, status.as_deref(), q.as_deref(), output.as_deref()).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
