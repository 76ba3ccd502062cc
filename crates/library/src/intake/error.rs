//! Error types for the [`intake`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.
//! None of these reach the caller of [`Intake::handle`](super::Intake::handle):
//! each one ends the processing of a single file and is reported through the
//! [`Notifier`](crate::host::Notifier).

use derive_more::{Display, Error};

/// An intake error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for intake operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies why a single file could not be attached.
///
/// ### Abort the file, no reference inserted
/// - [`ErrorKind::Transform`]
/// - [`ErrorKind::Listing`]
/// - [`ErrorKind::CreateDirectory`]
/// - [`ErrorKind::Decode`]
/// - [`ErrorKind::Lookup`]
///
/// ### Reference inserted anyway
/// - [`ErrorKind::Write`]
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The image could not be brought under the size limit.
    #[display("could not compress {_0}")]
    Transform(#[error(not(source))] String),
    /// Existing attachments could not be listed to number a new image.
    #[display("could not list existing attachments")]
    Listing,
    #[display("could not create folder {_0}")]
    CreateDirectory(#[error(not(source))] String),
    /// The file has no content.
    #[display("{_0} is empty")]
    Decode(#[error(not(source))] String),
    /// The target path could not be checked for an existing file.
    #[display("could not check whether {_0} exists")]
    Lookup(#[error(not(source))] String),
    #[display("could not save {_0}")]
    Write(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Decode(_))
    }
}
