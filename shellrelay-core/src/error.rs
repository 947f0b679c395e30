//! Core error types
//!
//! Re-exports shellrelay-error and maps provider failures onto it.

pub use shellrelay_error::{Error, ErrorKind, ErrorStatus, Result};

use crate::provider::{ProviderError, Role};

impl From<ProviderError> for Error {
    fn from(err: ProviderError) -> Self {
        let message = err.to_string();
        let error = match &err {
            ProviderError::Network(_) => Error::network_failed(message),
            ProviderError::Api { status, .. } => {
                let status = *status;
                let error = Error::inference_failed(message).with_context("status", status.to_string());
                if status >= 500 {
                    error.temporary()
                } else {
                    error.permanent()
                }
            }
            ProviderError::Parse(_) => Error::parse_failed(message),
            ProviderError::RateLimited { retry_after } => {
                let error = Error::new(ErrorKind::RateLimited, message);
                match retry_after {
                    Some(secs) => error.with_context("retry_after", secs.to_string()),
                    None => error,
                }
            }
            ProviderError::AuthenticationFailed => {
                Error::new(ErrorKind::AuthenticationFailed, message)
            }
            ProviderError::EmptyResponse(_) => Error::inference_failed(message).permanent(),
            ProviderError::Other(_) => Error::unexpected(message),
        };
        error.set_source(err)
    }
}

/// A message was appended in a position the conversation order forbids
pub fn out_of_order(role: Role, after: Role) -> Error {
    Error::invalid_state(format!("{} message cannot follow {} message", role, after))
        .with_context("role", role.as_str())
        .with_context("after", after.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_mapping() {
        let err: Error = ProviderError::AuthenticationFailed.into();
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
        assert!(!err.is_retryable());

        let err: Error = ProviderError::Network("connection refused".into()).into();
        assert_eq!(err.kind(), ErrorKind::NetworkFailed);
        assert!(err.is_retryable());
        assert!(err.source_ref().is_some());

        let err: Error = ProviderError::Api { status: 400, message: "bad role".into() }.into();
        assert_eq!(err.kind(), ErrorKind::InferenceFailed);
        assert!(!err.is_retryable());
        assert_eq!(err.context()[0], ("status", "400".to_string()));

        let err: Error = ProviderError::RateLimited { retry_after: Some(3) }.into();
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert_eq!(err.context()[0], ("retry_after", "3".to_string()));
    }

    #[test]
    fn test_out_of_order() {
        let err = out_of_order(Role::Assistant, Role::System);
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(err.message(), "assistant message cannot follow system message");
    }
}
