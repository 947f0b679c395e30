//! # shellrelay core
//!
//! The building blocks of the shell relay.
//!
//! ## Core Concepts
//! - **History**: append-only conversation log, seeded with one system message
//! - **Provider**: trait-based chat-completion client (OpenAI-compatible)
//! - **Extractor**: finds `<command>...</command>` blocks in assistant text
//! - **Executor**: runs a command in the host shell with a bounded wait
//! - **Config**: environment-derived settings, read once at startup

pub mod config;
pub mod error;
pub mod executor;
pub mod extract;
pub mod history;
pub mod provider;

pub use config::{load_system_prompt, RelayConfig, FALLBACK_SYSTEM_PROMPT};
pub use error::{Error, ErrorKind, ErrorStatus, Result};
pub use executor::{Executor, ShellExecutor, DEFAULT_COMMAND_TIMEOUT};
pub use extract::{extract_commands, COMMAND_END, COMMAND_START};
pub use history::History;
pub use provider::{
    ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider,
    OpenAIProvider, ProviderConfig, ProviderError, Role, ToolResultRole, Usage, UsageTracker,
    COMMAND_OUTPUT_LABEL,
};
