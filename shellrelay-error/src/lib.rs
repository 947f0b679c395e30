//! # shellrelay-error
//!
//! Unified error handling for shellrelay.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what error occurred (e.g., ConfigInvalid, NetworkFailed)
//! - **ErrorStatus**: Know whether retrying could help (Permanent, Temporary, Persistent)
//! - **Error Context**: Assist in locating the cause with key-value context
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use shellrelay_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::ConfigInvalid, "OPENAI_API_KEY is not set")
//!         .with_operation("config::from_env")
//!         .with_context("variable", "OPENAI_API_KEY"))
//! }
//! ```
//!
//! ## Principles
//!
//! - Fallible functions return `Result<T, shellrelay_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent layers only append context
//! - Command execution failures are *not* errors; they are folded into
//!   the conversation as text by the executor

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using shellrelay Error
pub type Result<T> = std::result::Result<T, Error>;
