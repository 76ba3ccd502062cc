//! File intake: dropped and pasted files into the vault.
//!
//! A batch goes through a gate (is there a document, is file handling on for
//! it), then a type filter that rejects the whole batch if any file is not an
//! image, PDF or zip archive. Accepted files are processed one after another
//! in the order given: named, saved under a sub-folder of the document's
//! folder and referenced in the document with an embed.
//!
//! Failures are contained per file. The caller only ever gets a
//! [`BatchOutcome`]; everything the user needs to know goes through the
//! [`Notifier`].

pub mod error;
mod file;
mod outcome;

pub use self::outcome::{BatchOutcome, FileOutcome, Rejection};
use crate::host::{Document, DocumentFile, ImageTransform, Notice, Notifier, PassThrough};
use crate::models::IncomingFile;
use daybook_config::{FileHandling, Settings};
use daybook_dates::parse_daily_note_path;
use daybook_storage::BackendHandle;
use std::sync::Arc;
use tracing::instrument;

/// Everything the pipeline needs besides the event itself.
pub struct Intake {
    backend: BackendHandle,
    settings: Settings,
    notifier: Arc<dyn Notifier>,
    transform: Arc<dyn ImageTransform>,
}

impl Intake {
    /// Creates a pipeline that leaves images uncompressed.
    pub fn new(backend: BackendHandle, settings: Settings, notifier: Arc<dyn Notifier>) -> Self {
        Self { backend, settings, notifier, transform: Arc::new(PassThrough) }
    }

    pub fn with_transform(mut self, transform: Arc<dyn ImageTransform>) -> Self {
        self.transform = transform;
        self
    }

    /// Decides whether a batch dropped into `document` is handled at all.
    ///
    /// Silent: the host falls back to its default behaviour.
    pub fn should_handle(&self, document: &dyn Document, files: &[IncomingFile]) -> Result<DocumentFile, Rejection> {
        if files.is_empty() {
            return Err(Rejection::NoFiles);
        }
        let target = document.file().ok_or(Rejection::NoDocument)?;
        match self.settings.file_handling {
            FileHandling::Disabled => Err(Rejection::Disabled),
            FileHandling::DailyNotesOnly if parse_daily_note_path(&target.path, &self.settings.date_format).is_none() => {
                Err(Rejection::NotDailyNote(target.path))
            },
            FileHandling::DailyNotesOnly | FileHandling::AllNotes => Ok(target),
        }
    }

    /// Rejects the batch if any file has a type the vault doesn't take.
    ///
    /// Unlike the gate, the user is told which file was refused.
    fn filter_types(&self, files: &[IncomingFile]) -> Result<(), Rejection> {
        let Some(refused) = files.iter().find(|f| !f.is_allowed()) else {
            return Ok(());
        };
        let message = format!(
            "Unsupported file type for {}: {}. Only images, PDF and zip files can be attached.",
            refused.name, refused.mime_type
        );
        self.notifier.notify(&message, Notice::Timed);
        Err(Rejection::UnsupportedType { name: refused.name.clone(), mime_type: refused.mime_type.clone() })
    }

    /// Handles one drop or paste event.
    ///
    /// Files are processed sequentially; a failing file does not stop the
    /// ones after it.
    #[instrument(level = "info", skip_all, fields(backend = self.backend.name(), files = files.len()))]
    pub async fn handle(&self, document: &mut dyn Document, files: Vec<IncomingFile>) -> BatchOutcome {
        let target = match self.should_handle(document, &files) {
            Ok(target) => target,
            Err(rejection) => {
                tracing::debug!(?rejection, "Batch not handled");
                return BatchOutcome::Rejected(rejection);
            },
        };
        if let Err(rejection) = self.filter_types(&files) {
            tracing::info!(?rejection, "Batch rejected");
            return BatchOutcome::Rejected(rejection);
        }

        let mut outcomes = Vec::with_capacity(files.len());
        for incoming in files {
            outcomes.push(self.intake_file(document, &target, incoming).await);
        }
        BatchOutcome::from_files(outcomes)
    }
}
