//! Command-line Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A command-line error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for command-line operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("could not open vault at {}", _0.display())]
    Vault(#[error(not(source))] PathBuf),
    #[display("could not read {}", _0.display())]
    ReadInput(#[error(not(source))] PathBuf),
    #[display("note not found: {_0}")]
    NoteNotFound(#[error(not(source))] String),
    #[display("could not save note {_0}")]
    SaveNote(#[error(not(source))] String),
    #[display("invalid date format: {_0}")]
    InvalidFormat(#[error(not(source))] String),
    #[display("daily note operation failed")]
    DailyNote,
}
