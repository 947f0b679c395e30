//! # shellrelay CLI
//!
//! Interactive relay between a chat-completion model and the local shell.
//!
//! Usage:
//!   shellrelay [OPTIONS]
//!
//! Examples:
//!   OPENAI_API_KEY=sk-... shellrelay
//!   shellrelay --model gpt-4o-mini --timeout 30
//!   shellrelay --base-url http://localhost:11434/v1 --model llama3 --prompt-file ops.md
//!
//! Every line typed is one turn. Commands the model wraps in
//! `<command>...</command>` run in the host shell without confirmation.

use clap::Parser;
use shellrelay_agent::{Relay, RelayEvent, Shutdown};
use shellrelay_core::config::parse_timeout_secs;
use shellrelay_core::{RelayConfig, Result, UsageTracker};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::BufReader;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shellrelay")]
#[command(author, version, about = "Relay a chat model's <command> blocks to your shell")]
struct Cli {
    /// Model identifier (overrides OPENAI_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Base URL of an OpenAI-compatible API (overrides OPENAI_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// System prompt file (default: prompt_instructions.md)
    #[arg(short, long)]
    prompt_file: Option<PathBuf>,

    /// Seconds to wait before a command is killed (default: 60)
    #[arg(short, long, value_parser = parse_timeout)]
    timeout: Option<Duration>,

    /// Enable debug logging and print token usage on exit
    #[arg(short, long)]
    verbose: bool,
}

fn parse_timeout(raw: &str) -> std::result::Result<Duration, String> {
    parse_timeout_secs(raw).map_err(|e| e.message().to_string())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_event(event: RelayEvent<'_>) {
    match event {
        RelayEvent::AwaitingInput => {
            print!("You: ");
            let _ = std::io::stdout().flush();
        }
        RelayEvent::AssistantReply(text) => println!("Assistant: {}", text),
        RelayEvent::CommandStarted(command) => println!("> Running: {}", command),
        RelayEvent::CommandFinished { output, .. } => println!("{}", output),
    }
}

fn print_usage(usage: &UsageTracker) {
    println!("\n--- Token Usage ({} calls) ---", usage.total_calls);
    let mut models: Vec<_> = usage.by_model.iter().collect();
    models.sort_by(|a, b| a.0.cmp(b.0));
    for (model, u) in models {
        println!(
            "  {}: {} prompt + {} completion = {} tokens",
            model, u.prompt_tokens, u.completion_tokens, u.total_tokens
        );
    }
    println!("  total: {} tokens", usage.total_tokens());
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed
async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = RelayConfig::from_env()?;
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(path) = cli.prompt_file {
        config = config.with_prompt_file(path);
    }
    if let Some(timeout) = cli.timeout {
        config = config.with_command_timeout(timeout);
    }
    debug!(
        model = %config.model,
        base_url = %config.base_url,
        timeout_secs = config.command_timeout.as_secs_f64(),
        tool_role = config.tool_result_role.as_str(),
        "configuration loaded"
    );

    let mut relay = Relay::from_config(&config)?.with_event_callback(print_event);

    println!(
        "Command relay started (model: {}). Type your messages. Ctrl+C to exit.",
        relay.model()
    );

    let stdin = BufReader::new(tokio::io::stdin());
    match relay.run(stdin, interrupt()).await? {
        Shutdown::Interrupted => println!("\nExiting."),
        Shutdown::EndOfInput => println!("Exiting."),
    }

    if cli.verbose {
        print_usage(relay.usage());
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            debug!("{:?}", e);
            1
        }
    };

    // the blocking stdin read behind tokio::io::stdin cannot be cancelled,
    // so leave without waiting for runtime shutdown
    std::process::exit(code);
}
