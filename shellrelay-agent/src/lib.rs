//! # shellrelay agent
//!
//! The relay runs the conversation between a chat-completion model and the
//! local shell:
//! 1. The operator types a line
//! 2. The whole history goes to the model
//! 3. Every `<command>...</command>` block in the reply runs in the shell
//! 4. Each command's output is appended so the model sees it next turn
//!
//! Completion failures end the run; command failures are just more output.

mod relay;

pub use relay::{CommandRun, Relay, RelayEvent, Shutdown, TurnOutcome};
