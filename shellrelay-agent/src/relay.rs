//! Relay implementation - drives the model <-> shell conversation loop

use std::future::Future;

use shellrelay_core::{
    extract_commands, load_system_prompt, CompletionRequest, Error, Executor, FinishReason,
    History, LlmProvider, OpenAIProvider, RelayConfig, Result, ShellExecutor, UsageTracker,
    COMMAND_OUTPUT_LABEL,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

/// Progress notifications emitted while the loop runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayEvent<'a> {
    /// The loop is waiting for the next line of operator input
    AwaitingInput,
    /// The model answered
    AssistantReply(&'a str),
    /// A command is about to run
    CommandStarted(&'a str),
    /// A command finished; `output` is exactly what goes back to the model
    CommandFinished { command: &'a str, output: &'a str },
}

/// One executed command and the text it produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRun {
    pub command: String,
    pub output: String,
}

/// Result of one full turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The assistant's reply, verbatim
    pub reply: String,
    /// Commands found in the reply, in the order they ran
    pub commands: Vec<CommandRun>,
    /// The model hit its output limit, so the reply may end inside a
    /// command block that was never closed
    pub truncated: bool,
}

/// Why [`Relay::run`] stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// The shutdown future resolved (operator interrupt)
    Interrupted,
    /// Input reached end of file
    EndOfInput,
}

type EventCallback = Box<dyn FnMut(RelayEvent<'_>)>;

/// The conversation loop. Owns the history exclusively.
pub struct Relay<P, E> {
    provider: P,
    executor: E,
    history: History,
    model: String,
    temperature: f32,
    usage: UsageTracker,
    on_event: Option<EventCallback>,
}

impl Relay<OpenAIProvider, ShellExecutor> {
    /// Build the production relay: OpenAI-compatible provider, host shell,
    /// and the system prompt loaded from the configured file.
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let provider = OpenAIProvider::new(config.provider_config())
            .map_err(|e| Error::from(e).with_operation("relay::from_config"))?;
        let executor = ShellExecutor::new(config.command_timeout);
        let system_prompt = load_system_prompt(&config.prompt_file)?;

        Ok(Relay::new(provider, executor, system_prompt)
            .with_model(config.model.clone())
            .with_temperature(config.temperature))
    }
}

impl<P: LlmProvider, E: Executor> Relay<P, E> {
    pub fn new(provider: P, executor: E, system_prompt: impl Into<String>) -> Self {
        let model = provider.default_model().to_string();
        Self {
            provider,
            executor,
            history: History::new(system_prompt),
            model,
            temperature: shellrelay_core::config::TEMPERATURE,
            usage: UsageTracker::new(),
            on_event: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Receive [`RelayEvent`]s as the loop progresses
    pub fn with_event_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(RelayEvent<'_>) + 'static,
    {
        self.on_event = Some(Box::new(callback));
        self
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn usage(&self) -> &UsageTracker {
        &self.usage
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn emit(&mut self, event: RelayEvent<'_>) {
        if let Some(callback) = self.on_event.as_mut() {
            callback(event);
        }
    }

    /// Run one turn: record `input`, ask the model, then run every command in
    /// its reply and record each output.
    ///
    /// A failed completion is returned as an error and ends the conversation.
    /// Failed commands are not errors; their diagnostics are recorded like
    /// any other output.
    pub async fn run_turn(&mut self, input: &str) -> Result<TurnOutcome> {
        self.history.push_user(input)?;
        let turn = self.history.turns();
        info!(turn, messages = self.history.len(), "starting turn");

        let request = CompletionRequest::new(self.history.messages().to_vec())
            .with_model(self.model.clone())
            .with_temperature(self.temperature);

        let response = self.provider.complete(request).await.map_err(|e| {
            Error::from(e)
                .with_operation("relay::run_turn")
                .with_context("provider", self.provider.name())
                .with_context("model", self.model.clone())
                .with_context("turn", turn.to_string())
        })?;
        self.usage.track(&response.model, &response.usage);

        let reply = response.content.ok_or_else(|| {
            Error::inference_failed("completion has no message content")
                .permanent()
                .with_operation("relay::run_turn")
                .with_context("response_id", response.id.clone())
        })?;

        let truncated = response.finish_reason == FinishReason::Length;
        if truncated {
            warn!(turn, response_id = %response.id, "reply cut off at the output token limit");
        }

        self.history.push_assistant(reply.clone())?;
        self.emit(RelayEvent::AssistantReply(&reply));

        let commands = extract_commands(&reply);
        debug!(turn, commands = commands.len(), "extracted commands");

        let mut runs = Vec::with_capacity(commands.len());
        for command in commands {
            self.emit(RelayEvent::CommandStarted(&command));
            let output = self.executor.execute(&command).await;
            self.history.push_tool_result(COMMAND_OUTPUT_LABEL, output.clone())?;
            self.emit(RelayEvent::CommandFinished {
                command: &command,
                output: &output,
            });
            runs.push(CommandRun { command, output });
        }

        Ok(TurnOutcome {
            reply,
            commands: runs,
            truncated,
        })
    }

    /// Read lines from `input`, one turn per line, until `shutdown` resolves
    /// or input ends.
    ///
    /// `shutdown` is only observed while waiting for input, so an interrupt
    /// that arrives mid-turn takes effect once the turn completes.
    pub async fn run<R, S>(&mut self, input: R, shutdown: S) -> Result<Shutdown>
    where
        R: AsyncBufRead + Unpin,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut lines = input.lines();

        loop {
            self.emit(RelayEvent::AwaitingInput);

            let line = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!(turns = self.history.turns(), "interrupted");
                    return Ok(Shutdown::Interrupted);
                }
                line = lines.next_line() => line.map_err(|e| {
                    Error::from(e).with_operation("relay::run")
                })?,
            };

            let Some(line) = line else {
                info!(turns = self.history.turns(), "input closed");
                return Ok(Shutdown::EndOfInput);
            };

            self.run_turn(&line).await?;
        }
    }
}
