//! # Conversation History
//!
//! The ordered, append-only message log for one process run.
//!
//! A history always starts with exactly one system message. After that the
//! order is fixed: a user message, the assistant's reply, then zero or more
//! tool-result messages, repeating. Appends that would break this order are
//! rejected, and nothing is ever removed or edited in place.

use crate::error::{self, Result};
use crate::provider::{ChatMessage, Role};

#[derive(Debug, Clone)]
pub struct History {
    messages: Vec<ChatMessage>,
}

impl History {
    /// Start a history seeded with the system prompt
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system_prompt)],
        }
    }

    /// All messages, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages, including the system message
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// A seeded history is never empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The seeding system message
    pub fn system(&self) -> &ChatMessage {
        &self.messages[0]
    }

    /// The most recent message
    pub fn last(&self) -> &ChatMessage {
        // never empty: `new` seeds the system message
        &self.messages[self.messages.len() - 1]
    }

    /// Number of completed or in-flight user turns
    pub fn turns(&self) -> usize {
        self.messages.iter().filter(|m| m.role == Role::User).count()
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> Result<()> {
        self.append(ChatMessage::user(content))
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> Result<()> {
        self.append(ChatMessage::assistant(content))
    }

    pub fn push_tool_result(&mut self, label: impl Into<String>, content: impl Into<String>) -> Result<()> {
        self.append(ChatMessage::tool_result(label, content))
    }

    fn append(&mut self, message: ChatMessage) -> Result<()> {
        let last = self.last().role;
        let allowed = match message.role {
            Role::System => false,
            Role::User => matches!(last, Role::System | Role::Assistant | Role::Tool),
            Role::Assistant => last == Role::User,
            Role::Tool => matches!(last, Role::Assistant | Role::Tool),
        };
        if !allowed {
            return Err(error::out_of_order(message.role, last)
                .with_operation("history::append")
                .with_context("position", self.messages.len().to_string()));
        }
        self.messages.push(message);
        Ok(())
    }
}
