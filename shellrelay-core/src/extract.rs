//! Command extraction from assistant replies.
//!
//! Commands are wrapped as `<command>...</command>`. The body may span
//! several lines; the shortest match wins, so two blocks on one line are two
//! commands.

use regex::Regex;
use std::sync::OnceLock;

pub const COMMAND_START: &str = "<command>";
pub const COMMAND_END: &str = "</command>";

fn command_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let pattern = format!(
            "(?s){}(.*?){}",
            regex::escape(COMMAND_START),
            regex::escape(COMMAND_END)
        );
        Regex::new(&pattern).expect("command pattern is a valid regex")
    })
}

/// Return every tagged command in `text`, trimmed, in order of appearance.
pub fn extract_commands(text: &str) -> Vec<String> {
    command_pattern()
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .collect()
}
