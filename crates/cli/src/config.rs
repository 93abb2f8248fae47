//! Configuration: `cardrelay.toml`, then environment overrides.
//!
//! Every value has a default, so a missing file is not an error. Secrets and
//! deployment-specific values normally come from the environment (a `.env`
//! file is loaded first by `main`); a non-empty environment variable always
//! wins over the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use llm::{LlmSettings, ProviderKind};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {name}: '{value}' ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

// ---------------------------------------------------------------------------
// File sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How often an idle worker re-checks the stop flag.
    pub poll_interval_ms: u64,
    /// How long shutdown waits for the in-flight event.
    pub shutdown_timeout_secs: u64,
    /// Public URL of `POST /webhook`, used by `register-webhook`.
    pub webhook_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            poll_interval_ms: 1000,
            shutdown_timeout_secs: 5,
            webhook_url: None,
        }
    }
}

impl ServerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrelloSection {
    pub api_base: String,
    pub key: Option<String>,
    pub token: Option<String>,
    pub board_id: Option<String>,
    pub in_progress_list_id: Option<String>,
    /// Serve cards from `mock_data_dir` and never write to Trello.
    pub mock: bool,
    pub label_map_path: PathBuf,
    pub mock_data_dir: PathBuf,
    pub comment_limit: usize,
    pub request_timeout_secs: u64,
}

impl Default for TrelloSection {
    fn default() -> Self {
        Self {
            api_base: trello::TRELLO_API_BASE.to_string(),
            key: None,
            token: None,
            board_id: None,
            in_progress_list_id: None,
            mock: false,
            label_map_path: PathBuf::from(trello::DEFAULT_LABEL_MAP_PATH),
            mock_data_dir: PathBuf::from(trello::DEFAULT_MOCK_DATA_DIR),
            comment_limit: relay::DEFAULT_COMMENT_LIMIT,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub provider: ProviderKind,
    pub ollama_url: String,
    pub ollama_model: String,
    pub openai_url: String,
    pub openai_model: String,
    pub openai_api_key: Option<String>,
    pub request_timeout_secs: u64,
    /// Models run by `compare-models` when `--models` is not given.
    pub compare_models: Vec<String>,
    pub report_dir: PathBuf,
}

impl Default for LlmSection {
    fn default() -> Self {
        let defaults = LlmSettings::default();
        Self {
            provider: defaults.provider,
            ollama_url: defaults.ollama_url,
            ollama_model: defaults.ollama_model,
            openai_url: defaults.openai_url,
            openai_model: defaults.openai_model,
            openai_api_key: None,
            request_timeout_secs: defaults.request_timeout.as_secs(),
            compare_models: processor::DEFAULT_COMPARISON_MODELS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            report_dir: PathBuf::from(processor::DEFAULT_REPORT_DIR),
        }
    }
}

impl LlmSection {
    pub fn settings(&self) -> LlmSettings {
        LlmSettings {
            provider: self.provider,
            ollama_url: self.ollama_url.clone(),
            ollama_model: self.ollama_model.clone(),
            openai_url: self.openai_url.clone(),
            openai_model: self.openai_model.clone(),
            openai_api_key: self.openai_api_key.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SlackSection {
    pub bot_token: Option<String>,
    /// Main channel (daily summaries).
    pub channel: Option<String>,
    /// Log channel (status lines).
    pub log_channel: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectSection {
    /// Replaces the built-in project context in every prompt.
    pub context_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_format: LogFormat,
    /// OTLP gRPC endpoint; spans are exported only when set.
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Text,
            otlp_endpoint: None,
            service_name: "cardrelay".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Whole configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub trello: TrelloSection,
    pub llm: LlmSection,
    pub slack: SlackSection,
    pub project: ProjectSection,
    pub telemetry: TelemetryConfig,
}

impl Config {
    /// Reads `path` (defaults if absent) and applies the process environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Parses `path`, or returns defaults when the file does not exist.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(path, &text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn parse(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlays environment variables read through `lookup`.
    ///
    /// Empty values are treated as unset.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        set(&mut self.trello.key, var("TRELLO_KEY"));
        set(&mut self.trello.token, var("TRELLO_TOKEN"));
        set(&mut self.trello.board_id, var("TRELLO_BOARD_ID"));
        set(&mut self.trello.in_progress_list_id, var("IN_PROGRESS_LIST_ID"));
        if let Some(mock) = var("MOCK_TRELLO") {
            self.trello.mock = mock.trim().eq_ignore_ascii_case("true");
        }

        set(&mut self.slack.bot_token, var("SLACK_BOT_TOKEN"));
        set(&mut self.slack.channel, var("SLACK_CHANNEL"));
        set(&mut self.slack.log_channel, var("SLACK_LOG_CHANNEL"));

        if let Some(provider) = var("AI_PROVIDER") {
            self.llm.provider = provider.parse().map_err(|err: llm::ProviderError| {
                ConfigError::Invalid {
                    name: "AI_PROVIDER",
                    value: provider.clone(),
                    reason: err.to_string(),
                }
            })?;
        }
        if let Some(model) = var("OLLAMA_MODEL") {
            self.llm.ollama_model = model;
        }
        if let Some(url) = var("OLLAMA_URL") {
            self.llm.ollama_url = url;
        }
        if let Some(model) = var("OPENAI_MODEL") {
            self.llm.openai_model = model;
        }
        set(&mut self.llm.openai_api_key, var("OPENAI_API_KEY"));

        if let Some(port) = var("PORT") {
            self.server.port = port.trim().parse().map_err(|err: std::num::ParseIntError| {
                ConfigError::Invalid {
                    name: "PORT",
                    value: port.clone(),
                    reason: err.to_string(),
                }
            })?;
        }
        set(&mut self.server.webhook_url, var("WEBHOOK_URL"));
        set(&mut self.telemetry.otlp_endpoint, var("OTEL_EXPORTER_OTLP_ENDPOINT"));
        Ok(())
    }

    /// Checks that the board can be reached: credentials, unless in mock mode.
    pub fn validate_board(&self) -> Result<(), ConfigError> {
        if self.trello.mock {
            return Ok(());
        }
        if self.trello.key.is_none() {
            return Err(ConfigError::Missing("TRELLO_KEY"));
        }
        if self.trello.token.is_none() {
            return Err(ConfigError::Missing("TRELLO_TOKEN"));
        }
        Ok(())
    }

    /// Board-level commands also need the board id.
    pub fn validate_board_admin(&self) -> Result<(), ConfigError> {
        if self.trello.mock {
            return Err(ConfigError::Invalid {
                name: "MOCK_TRELLO",
                value: "true".to_string(),
                reason: "board administration needs the real Trello API".to_string(),
            });
        }
        self.validate_board()?;
        if self.trello.board_id.is_none() {
            return Err(ConfigError::Missing("TRELLO_BOARD_ID"));
        }
        Ok(())
    }

    /// The selected LLM provider must be usable.
    pub fn validate_llm(&self) -> Result<(), ConfigError> {
        if self.llm.provider == ProviderKind::OpenAi && self.llm.openai_api_key.is_none() {
            return Err(ConfigError::Missing("OPENAI_API_KEY"));
        }
        Ok(())
    }
}

fn set(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}
