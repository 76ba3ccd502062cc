//! Date Error Types
//!
//! Structured errors using `exn` for automatic location tracking, in the same
//! shape as every other crate in the workspace.

use derive_more::{Display, Error};

/// A date derivation error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for date operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The format string could not be compiled.
    #[display("invalid date format: {_0}")]
    InvalidFormat(#[error(not(source))] String),
    /// The format string uses a token that has no rendering equivalent.
    #[display("unsupported token `{token}` in date format: {format}")]
    UnsupportedToken {
        /// The offending token.
        token: String,
        /// The complete format string.
        format: String,
    },
    /// A compiled format could not render the given timestamp.
    #[display("could not render timestamp")]
    Render,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A format either compiles and renders or it doesn't.
        false
    }
}
