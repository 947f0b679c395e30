//! # Relay Configuration
//!
//! Everything the relay needs from the environment, read once at startup
//! into an explicit [`RelayConfig`] that is passed by reference from there on.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};
use crate::executor::DEFAULT_COMMAND_TIMEOUT;
use crate::provider::{openai, ProviderConfig, ToolResultRole};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "OPENAI_MODEL";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const COMMAND_TIMEOUT_ENV: &str = "SHELLRELAY_COMMAND_TIMEOUT";
pub const TOOL_ROLE_ENV: &str = "SHELLRELAY_TOOL_ROLE";

/// Looked up in the working directory unless overridden
pub const DEFAULT_PROMPT_FILE: &str = "prompt_instructions.md";

/// Used when the prompt file does not exist
pub const FALLBACK_SYSTEM_PROMPT: &str = "You are a shell assistant. When you want to run a command, \
wrap the command inside <command> and </command> tags. \
Provide explanations outside of the tags.";

/// Sampling temperature sent with every request
pub const TEMPERATURE: f32 = 0.0;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub command_timeout: Duration,
    pub tool_result_role: ToolResultRole,
    pub http_timeout_secs: u64,
    pub prompt_file: PathBuf,
}

impl RelayConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = var(API_KEY_ENV)
            .ok_or_else(|| Error::missing_env(API_KEY_ENV).with_operation("config::from_env"))?;

        let command_timeout = match var(COMMAND_TIMEOUT_ENV) {
            Some(raw) => parse_timeout_secs(&raw)
                .map_err(|e| e.with_context("variable", COMMAND_TIMEOUT_ENV))?,
            None => DEFAULT_COMMAND_TIMEOUT,
        };

        let tool_result_role = match var(TOOL_ROLE_ENV) {
            Some(raw) => raw
                .parse::<ToolResultRole>()
                .map_err(|e| e.with_operation("config::from_env").with_context("variable", TOOL_ROLE_ENV))?,
            None => ToolResultRole::default(),
        };

        Ok(Self {
            api_key,
            model: var(MODEL_ENV).unwrap_or_else(|| openai::DEFAULT_MODEL.to_string()),
            base_url: var(BASE_URL_ENV).unwrap_or_else(|| openai::DEFAULT_BASE_URL.to_string()),
            temperature: TEMPERATURE,
            command_timeout,
            tool_result_role,
            http_timeout_secs: 120,
            prompt_file: PathBuf::from(DEFAULT_PROMPT_FILE),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn with_prompt_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.prompt_file = path.into();
        self
    }

    /// The provider-facing slice of this configuration
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::openai(self.api_key.clone())
            .with_model(self.model.clone())
            .with_base_url(self.base_url.clone())
            .with_timeout(self.http_timeout_secs)
            .with_tool_result_role(self.tool_result_role)
    }

    /// Load the system prompt from `prompt_file`
    pub fn system_prompt(&self) -> Result<String> {
        load_system_prompt(&self.prompt_file)
    }
}

/// Parse a positive number of seconds, fractional values allowed
pub fn parse_timeout_secs(raw: &str) -> Result<Duration> {
    let secs: f64 = raw.trim().parse().map_err(|_| {
        Error::config_invalid(format!("invalid command timeout '{}'", raw.trim()))
            .with_operation("config::parse_timeout_secs")
    })?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(Error::config_invalid(format!("command timeout must be positive, got {}", secs))
            .with_operation("config::parse_timeout_secs"));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| {
        Error::config_invalid(format!("command timeout {} is out of range", secs))
            .with_operation("config::parse_timeout_secs")
            .set_source(e)
    })
}

/// Read the system prompt from `path`, or fall back to the built-in
/// instructions when the file does not exist. Any other read error is fatal.
pub fn load_system_prompt(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(prompt) => {
            debug!(path = %path.display(), chars = prompt.len(), "loaded system prompt");
            Ok(prompt)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "prompt file not found, using built-in instructions");
            Ok(FALLBACK_SYSTEM_PROMPT.to_string())
        }
        Err(e) => Err(Error::from(e)
            .with_operation("config::load_system_prompt")
            .with_context("path", path.display().to_string())),
    }
}
