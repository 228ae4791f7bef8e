use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Endpoint prefix; the project id is appended directly.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Project ids fetched by `pulse sync` when no override is given.
    pub project_ids: Vec<u64>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://apis.dappradar.com/v2/dapps/".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Normalized snapshot — the sole source of truth for all consumers.
    pub snapshot_path: PathBuf,
    /// Unnormalized fetch responses, written for audit and never read back.
    pub raw_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssistantConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            provider: "disabled".to_string(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_model() -> String {
    "gpt-4".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7878".to_string()
}

impl AssistantConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

impl Config {
    /// A throwaway configuration for tests and config-less code paths.
    pub fn minimal() -> Self {
        Self {
            api: ApiConfig {
                base_url: default_base_url(),
                project_ids: Vec::new(),
                timeout_secs: default_timeout_secs(),
            },
            storage: StorageConfig {
                snapshot_path: PathBuf::from("./data/projects.json"),
                raw_path: PathBuf::from("./data/raw_projects.json"),
            },
            assistant: AssistantConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate api
    if config.api.base_url.is_empty() {
        anyhow::bail!("api.base_url must not be empty");
    }
    if !config.api.base_url.starts_with("http") {
        anyhow::bail!("api.base_url must start with http or https");
    }
    if config.api.timeout_secs == 0 {
        anyhow::bail!("api.timeout_secs must be > 0");
    }

    // Validate assistant
    match config.assistant.provider.as_str() {
        "disabled" | "openai" => {}
        other => anyhow::bail!(
            "Unknown assistant provider: '{}'. Must be disabled or openai.",
            other
        ),
    }
    if config.assistant.is_enabled() && config.assistant.model.is_empty() {
        anyhow::bail!(
            "assistant.model must be specified when provider is '{}'",
            config.assistant.provider
        );
    }

    Ok(config)
}
