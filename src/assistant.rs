//! Dataset-grounded assistant bridge.
//!
//! Forwards one user question plus the entire normalized snapshot to a
//! chat-completion API and returns the text answer. The bridge holds no
//! conversation state: every call is grounded on the snapshot alone
//! (chat history, if a front-end keeps one, is display-only and never
//! forwarded). Every failure — missing snapshot, missing key, transport
//! error, malformed response — is converted into a descriptive answer
//! string at this boundary; callers never see an `Err`.
//!
//! # Provider Selection
//!
//! Use [`create_provider`] to instantiate the appropriate provider based
//! on the configuration:
//!
//! ```rust
//! # use dapp_pulse::config::AssistantConfig;
//! # use dapp_pulse::assistant::create_provider;
//! let config = AssistantConfig::default(); // provider = "disabled"
//! let provider = create_provider(&config).unwrap();
//! assert_eq!(provider.model_name(), "disabled");
//! ```

use anyhow::{bail, Result};
use serde_json::Value;
use std::time::Duration;

use crate::config::{AssistantConfig, Config};
use crate::store;

/// Environment variable holding the chat-completion API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Fixed system preamble describing the assistant's role.
const SYSTEM_PROMPT: &str = "You are an AI assistant for crypto projects.";

/// Trait for chat providers.
///
/// Defines the interface that all chat backends must implement.
/// The actual completion call is performed by [`complete`] (kept as a
/// free function due to async trait limitations).
pub trait ChatProvider: Send + Sync {
    /// Returns the model identifier (e.g. `"gpt-4"`).
    fn model_name(&self) -> &str;
}

/// A no-op provider that always returns errors.
///
/// Used when `assistant.provider = "disabled"` in the configuration,
/// so the rest of the crate works without an LLM key.
pub struct DisabledProvider;

impl ChatProvider for DisabledProvider {
    fn model_name(&self) -> &str {
        "disabled"
    }
}

/// Chat provider using the OpenAI chat-completions API.
///
/// Requires the `OPENAI_API_KEY` environment variable to be set.
pub struct OpenAIProvider {
    model: String,
}

impl OpenAIProvider {
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        if std::env::var(API_KEY_VAR).is_err() {
            bail!("{} environment variable not set", API_KEY_VAR);
        }

        Ok(Self {
            model: config.model.clone(),
        })
    }
}

impl ChatProvider for OpenAIProvider {
    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Create the appropriate [`ChatProvider`] based on configuration.
pub fn create_provider(config: &AssistantConfig) -> Result<Box<dyn ChatProvider>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledProvider)),
        "openai" => Ok(Box::new(OpenAIProvider::new(config)?)),
        other => bail!("Unknown assistant provider: {}", other),
    }
}

/// Answer a question against the current snapshot.
///
/// Always returns a displayable string. A missing snapshot yields the
/// literal data-not-found message; any other failure yields a
/// descriptive error string in place of an answer.
pub async fn ask(config: &Config, question: &str) -> String {
    let projects = match store::read_snapshot(&config.storage.snapshot_path) {
        Ok(projects) => projects,
        Err(_) => {
            return format!(
                "Data not found. Run `pulse sync` to create {}.",
                config.storage.snapshot_path.display()
            );
        }
    };

    let dataset = match serde_json::to_string(&projects) {
        Ok(dataset) => dataset,
        Err(e) => return format!("Error during assistant response generation: {}", e),
    };

    let answer = match create_provider(&config.assistant) {
        Ok(provider) => complete(provider.as_ref(), &config.assistant, question, &dataset).await,
        Err(e) => Err(e),
    };

    match answer {
        Ok(text) => text,
        Err(e) => format!("Error during assistant response generation: {}", e),
    }
}

/// Run one chat completion using the configured provider.
///
/// Dispatches to the appropriate backend based on the config's
/// `provider` field. Deterministic sampling: temperature is always 0.
pub async fn complete(
    _provider: &dyn ChatProvider,
    config: &AssistantConfig,
    question: &str,
    dataset: &str,
) -> Result<String> {
    match config.provider.as_str() {
        "openai" => complete_openai(config, question, dataset).await,
        "disabled" => bail!("Assistant provider is disabled"),
        other => bail!("Unknown assistant provider: {}", other),
    }
}

/// Build the two-message exchange sent to the model: the fixed system
/// preamble and the question with the serialized dataset appended.
fn build_messages(question: &str, dataset: &str) -> Value {
    serde_json::json!([
        {"role": "system", "content": SYSTEM_PROMPT},
        {
            "role": "user",
            "content": format!("{}\n\nHere is the data: {}", question, dataset),
        },
    ])
}

async fn complete_openai(config: &AssistantConfig, question: &str, dataset: &str) -> Result<String> {
    let api_key =
        std::env::var(API_KEY_VAR).map_err(|_| anyhow::anyhow!("{} not set", API_KEY_VAR))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let body = serde_json::json!({
        "model": config.model,
        "messages": build_messages(question, dataset),
        "temperature": 0,
    });

    let response = client
        .post("https://api.openai.com/v1/chat/completions")
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body_text = response.text().await.unwrap_or_default();
        bail!("OpenAI API error {}: {}", status, body_text);
    }

    let json: Value = response.json().await?;
    parse_completion(&json)
}

/// Extract `choices[0].message.content` from the response JSON.
fn parse_completion(json: &Value) -> Result<String> {
    json.get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Invalid chat response: missing message content"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_provider_disabled() {
        let provider = create_provider(&AssistantConfig::default()).unwrap();
        assert_eq!(provider.model_name(), "disabled");
    }

    #[test]
    fn test_create_provider_unknown() {
        let config = AssistantConfig {
            provider: "mystery".to_string(),
            ..AssistantConfig::default()
        };
        assert!(create_provider(&config).is_err());
    }

    #[test]
    fn test_build_messages_shape() {
        let messages = build_messages("Which projects run on polygon?", "[{\"x\":1}]");
        let messages = messages.as_array().unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], SYSTEM_PROMPT);
        assert_eq!(messages[1]["role"], "user");

        let user_content = messages[1]["content"].as_str().unwrap();
        assert!(user_content.starts_with("Which projects run on polygon?"));
        assert!(user_content.contains("Here is the data: [{\"x\":1}]"));
    }

    #[test]
    fn test_parse_completion_extracts_content() {
        let response = json!({
            "choices": [{"message": {"role": "assistant", "content": "Two projects."}}]
        });
        assert_eq!(parse_completion(&response).unwrap(), "Two projects.");
    }

    #[test]
    fn test_parse_completion_missing_content() {
        let response = json!({"choices": []});
        assert!(parse_completion(&response).is_err());
    }

    #[tokio::test]
    async fn test_ask_without_snapshot_returns_message() {
        let mut config = crate::config::Config::minimal();
        config.storage.snapshot_path = std::path::PathBuf::from("/nonexistent/projects.json");

        let answer = ask(&config, "anything").await;
        assert!(answer.starts_with("Data not found."), "got: {}", answer);
    }

    #[tokio::test]
    async fn test_ask_with_disabled_provider_degrades_to_string() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("projects.json");
        let projects = vec![crate::normalize::normalize(&json!({}))];
        crate::store::write_snapshot(&path, &projects).unwrap();

        let mut config = crate::config::Config::minimal();
        config.storage.snapshot_path = path;

        let answer = ask(&config, "anything").await;
        assert!(
            answer.contains("Assistant provider is disabled"),
            "got: {}",
            answer
        );
    }
}
