//! Error kinds for shellrelay operations

use std::fmt;

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to decide how to report a failure. Every
/// kind here is fatal to the relay; command-level failures never surface
/// as an `ErrorKind` because the executor turns them into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// Invalid configuration or missing credential
    ConfigInvalid,

    /// An operation would break the conversation ordering
    InvalidState,

    // =========================================================================
    // Completion service errors
    // =========================================================================
    /// Could not reach the completion service
    NetworkFailed,

    /// The service rejected the credential
    AuthenticationFailed,

    /// Rate limit exceeded
    RateLimited,

    /// The service answered, but without a usable completion
    InferenceFailed,

    /// Failed to parse a response body
    ParseFailed,

    // =========================================================================
    // IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            // General
            ErrorKind::Unexpected => "Unexpected",
            ErrorKind::ConfigInvalid => "ConfigInvalid",
            ErrorKind::InvalidState => "InvalidState",

            // Completion service
            ErrorKind::NetworkFailed => "NetworkFailed",
            ErrorKind::AuthenticationFailed => "AuthenticationFailed",
            ErrorKind::RateLimited => "RateLimited",
            ErrorKind::InferenceFailed => "InferenceFailed",
            ErrorKind::ParseFailed => "ParseFailed",

            // IO
            ErrorKind::FileNotFound => "FileNotFound",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::IoFailed => "IoFailed",
        }
    }

    /// Check if this error kind is retryable by default
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::NetworkFailed | ErrorKind::RateLimited | ErrorKind::InferenceFailed
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::ConfigInvalid.to_string(), "ConfigInvalid");
        assert_eq!(ErrorKind::AuthenticationFailed.to_string(), "AuthenticationFailed");
    }

    #[test]
    fn test_is_retryable() {
        assert!(ErrorKind::NetworkFailed.is_retryable());
        assert!(ErrorKind::RateLimited.is_retryable());
        assert!(!ErrorKind::ConfigInvalid.is_retryable());
        assert!(!ErrorKind::AuthenticationFailed.is_retryable());
        assert!(!ErrorKind::InvalidState.is_retryable());
    }
}
