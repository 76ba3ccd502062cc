use crate::models::SavedAttachment;
use derive_more::Display;

/// What happened to a single file of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Written to the vault and referenced in the document.
    Saved(SavedAttachment),
    /// Something already occupied the target path; it was referenced instead
    /// of being overwritten.
    AlreadyExists(SavedAttachment),
    /// Referenced in the document, but the write failed.
    WriteFailed(SavedAttachment),
    /// Processing stopped before a reference was inserted.
    Aborted {
        /// Name of the incoming file.
        name: String,
    },
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved(_) | Self::AlreadyExists(_))
    }

    /// The attachment referenced in the document, if any.
    pub fn attachment(&self) -> Option<&SavedAttachment> {
        match self {
            Self::Saved(a) | Self::AlreadyExists(a) | Self::WriteFailed(a) => Some(a),
            Self::Aborted { .. } => None,
        }
    }
}

/// Why a whole batch was left to the host's default handling.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[display("no files")]
    NoFiles,
    /// The active document isn't backed by a file.
    #[display("no file-backed document")]
    NoDocument,
    /// File handling is switched off.
    #[display("file handling is disabled")]
    Disabled,
    /// Only daily notes are handled and this document isn't one.
    #[display("{_0} is not a daily note")]
    NotDailyNote(String),
    /// At least one file is neither an image, a PDF nor a zip archive.
    #[display("unsupported file type for {name}: {mime_type}")]
    UnsupportedType {
        /// The first offending file.
        name: String,
        mime_type: String,
    },
}

/// Result of handling one drop or paste event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Nothing was written and the document is untouched.
    Rejected(Rejection),
    /// Every file ended up referenced and present in the vault.
    Completed(Vec<FileOutcome>),
    /// At least one file failed; the others were still processed.
    PartialFailure(Vec<FileOutcome>),
}

impl BatchOutcome {
    pub(crate) fn from_files(files: Vec<FileOutcome>) -> Self {
        match files.iter().all(FileOutcome::is_success) {
            true => Self::Completed(files),
            false => Self::PartialFailure(files),
        }
    }

    /// Whether the pipeline took over the event. A host should suppress its
    /// own paste/drop handling when this is `true`.
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }

    pub fn files(&self) -> &[FileOutcome] {
        match self {
            Self::Rejected(_) => &[],
            Self::Completed(files) | Self::PartialFailure(files) => files,
        }
    }
}
