use crate::host::{CompressOptions, Document, DocumentFile, Notice};
use crate::intake::error::{ErrorKind, Result};
use crate::intake::{FileOutcome, Intake};
use crate::models::{IncomingFile, SavedAttachment};
use crate::naming::{count_siblings_with_prefix, image_name, image_prefix, join, other_name};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use daybook_storage::to_vault_string;
use exn::ResultExt;
use std::path::Path;

/// Where an incoming file goes, decided before anything is written.
struct Placement {
    dir: String,
    path: String,
    file: IncomingFile,
}

impl Intake {
    /// Processes a single file of an accepted batch.
    ///
    /// Never fails: errors become a [`FileOutcome`] and a persistent notice.
    pub(super) async fn intake_file(
        &self,
        document: &mut dyn Document,
        target: &DocumentFile,
        incoming: IncomingFile,
    ) -> FileOutcome {
        let name = incoming.name.clone();
        match self.save(document, target, incoming).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let kind: &ErrorKind = &e;
                tracing::warn!(name = %name, error = %kind, "Attachment aborted");
                self.notifier.notify(&format!("Could not attach {name}: {kind}"), Notice::Persistent);
                FileOutcome::Aborted { name }
            },
        }
    }

    async fn save(&self, document: &mut dyn Document, target: &DocumentFile, incoming: IncomingFile) -> Result<FileOutcome> {
        let Placement { dir, path, file } = self.place(target, incoming).await?;

        if !dir.is_empty() {
            self.backend.create_dir_all(Path::new(&dir)).await.or_raise(|| ErrorKind::CreateDirectory(dir.clone()))?;
        }
        let data = round_trip(&file)?;

        let attachment = SavedAttachment::new(path.as_str(), self.settings.embed_width());
        let existing = self.backend.entry(Path::new(&path)).await.or_raise(|| ErrorKind::Lookup(path.clone()))?;
        if existing.is_some() {
            tracing::info!(path = %path, "Attachment already exists, reusing it");
            self.notifier.notify(&format!("File already exists: {path}"), Notice::Timed);
            document.replace_selection(&attachment.link);
            return Ok(FileOutcome::AlreadyExists(attachment));
        }

        let written = self.backend.write(Path::new(&path), &data).await.or_raise(|| ErrorKind::Write(path.clone()));
        document.replace_selection(&attachment.link);
        match written {
            Ok(()) => {
                tracing::info!(path = %path, bytes = data.len(), "Attachment saved");
                Ok(FileOutcome::Saved(attachment))
            },
            Err(e) => {
                let kind: &ErrorKind = &e;
                tracing::warn!(path = %path, error = %kind, "Attachment referenced but not saved");
                self.notifier.notify(&format!("Failed to save {path}: the link was inserted anyway"), Notice::Persistent);
                Ok(FileOutcome::WriteFailed(attachment))
            },
        }
    }

    /// Compresses images when a size limit is set and picks the folder and
    /// name for the file.
    async fn place(&self, target: &DocumentFile, incoming: IncomingFile) -> Result<Placement> {
        if !incoming.is_image() {
            let dir = join(&[target.parent.as_str(), self.settings.other_files_sub_dir.as_str()]);
            let name = other_name(&target.basename, incoming.stem(), incoming.extension());
            let path = join(&[dir.as_str(), name.as_str()]);
            return Ok(Placement { dir, path, file: incoming });
        }

        let file = match self.settings.image_size_limit_kb() {
            Some(target_size_kb) => {
                let options = CompressOptions { target_size_kb, preserve_metadata: self.settings.preserve_exif_data };
                let name = incoming.name.clone();
                self.transform.compress(incoming, options).await.or_raise(|| ErrorKind::Transform(name.clone()))?
            },
            None => incoming,
        };

        // Images are numbered across the document's whole folder, sub-folders
        // included.
        let existing = self.backend.list(None).await.or_raise(|| ErrorKind::Listing)?;
        let paths: Vec<String> = existing.iter().filter_map(|info| to_vault_string(&info.path).ok()).collect();
        let count =
            count_siblings_with_prefix(paths.iter().map(String::as_str), &target.parent, &image_prefix(&target.basename));

        let dir = join(&[target.parent.as_str(), self.settings.image_sub_dir.as_str()]);
        let path = join(&[dir.as_str(), image_name(&target.basename, count, file.extension()).as_str()]);
        Ok(Placement { dir, path, file })
    }
}

/// Encodes the payload as base64 and decodes it again, the same path the
/// bytes take through a host that only hands out data URLs.
fn round_trip(file: &IncomingFile) -> Result<Vec<u8>> {
    if file.data.is_empty() {
        exn::bail!(ErrorKind::Decode(file.name.clone()));
    }
    let encoded = STANDARD.encode(&file.data);
    let decoded = STANDARD.decode(encoded).or_raise(|| ErrorKind::Decode(file.name.clone()))?;
    Ok(decoded)
}
