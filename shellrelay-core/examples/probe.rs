//! Example: send one prompt and show which commands the model would run
//!
//! Nothing is executed. Run with:
//!   OPENAI_API_KEY=sk-xxx cargo run --example probe -- "how much disk space is free?"
//!
//!   # Against a local OpenAI-compatible server:
//!   OPENAI_API_KEY=unused OPENAI_BASE_URL=http://localhost:11434/v1 OPENAI_MODEL=llama3 \
//!     cargo run --example probe -- "list the five largest files here"

use shellrelay_core::{
    extract_commands, ChatMessage, CompletionRequest, LlmProvider, OpenAIProvider, RelayConfig,
};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let prompt = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if prompt.is_empty() {
        eprintln!("usage: probe <prompt>...");
        std::process::exit(2);
    }

    let config = RelayConfig::from_env()?;
    let provider = OpenAIProvider::new(config.provider_config())?;

    let request = CompletionRequest::new(vec![
        ChatMessage::system(config.system_prompt()?),
        ChatMessage::user(prompt),
    ])
    .with_model(config.model.clone())
    .with_temperature(config.temperature);

    let response = provider.complete(request).await?;
    let content = response.content.unwrap_or_default();

    println!("=== REPLY ({}) ===\n{}\n", response.model, content);

    let commands = extract_commands(&content);
    if commands.is_empty() {
        println!("(no <command> blocks)");
    }
    for (i, command) in commands.iter().enumerate() {
        println!("{:2}. {}", i + 1, command);
    }
    println!(
        "\ntokens: {} prompt + {} completion",
        response.usage.prompt_tokens, response.usage.completion_tokens
    );
    Ok(())
}
