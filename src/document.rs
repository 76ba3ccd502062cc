use crate::error::{ErrorKind, Result};
use daybook_library::host::{Document, DocumentFile};
use daybook_storage::backend::StorageBackend;
use daybook_storage::to_vault_string;
use exn::ResultExt;
use std::path::Path;

/// A note loaded from the vault, edited in memory.
///
/// There's no cursor on the command line, so the "selection" is the end of
/// the note: every embed lands on its own line after the existing content.
pub struct NoteDocument {
    file: DocumentFile,
    content: String,
    dirty: bool,
}

impl NoteDocument {
    pub async fn open(backend: &dyn StorageBackend, path: &str) -> Result<Self> {
        let path = to_vault_string(path).or_raise(|| ErrorKind::NoteNotFound(path.to_string()))?;
        let bytes = backend.read(Path::new(&path)).await.or_raise(|| ErrorKind::NoteNotFound(path.clone()))?;
        Ok(Self::new(path, String::from_utf8_lossy(&bytes).into_owned()))
    }

    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self { file: DocumentFile::from_path(path), content: content.into(), dirty: false }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Writes the note back if anything was inserted.
    pub async fn save(&self, backend: &dyn StorageBackend) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        backend
            .write(Path::new(&self.file.path), self.content.as_bytes())
            .await
            .or_raise(|| ErrorKind::SaveNote(self.file.path.clone()))?;
        Ok(true)
    }
}

impl Document for NoteDocument {
    fn file(&self) -> Option<DocumentFile> {
        Some(self.file.clone())
    }

    fn replace_selection(&mut self, text: &str) {
        if !self.content.is_empty() && !self.content.ends_with('\n') {
            self.content.push('\n');
        }
        self.content.push_str(text);
        self.content.push('\n');
        self.dirty = true;
    }
}
