//! Collaborators supplied by the application hosting the pipeline.
//!
//! The pipeline never talks to an editor, a notification area or an image
//! codec directly; the host hands in implementations of these traits.

use crate::intake::error::Result;
use crate::models::IncomingFile;
use async_trait::async_trait;

/// Where the active document lives in the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    /// Vault path of the document, `/`-separated.
    pub path: String,
    /// Vault path of the folder containing the document, `""` at the root.
    pub parent: String,
    /// File name without extension.
    pub basename: String,
}

impl DocumentFile {
    /// Splits a vault path into its parts.
    ///
    /// ```
    /// use daybook_library::host::DocumentFile;
    ///
    /// let file = DocumentFile::from_path("Daily/2024/Jan/2024-01-15.md");
    /// assert_eq!(file.parent, "Daily/2024/Jan");
    /// assert_eq!(file.basename, "2024-01-15");
    /// ```
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let (parent, name) = path.rsplit_once('/').unwrap_or(("", path.as_str()));
        let basename = match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        }
        .to_string();
        let parent = parent.to_string();
        Self { path, parent, basename }
    }
}

/// The document files are dropped into.
pub trait Document {
    /// The file backing this document, `None` for unsaved buffers.
    fn file(&self) -> Option<DocumentFile>;

    /// Replaces the current selection (or inserts at the cursor).
    fn replace_selection(&mut self, text: &str);
}

/// How long a notice stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Dismissed after the host's default duration.
    Timed,
    /// Stays until the user dismisses it.
    Persistent,
}

/// User-visible notifications.
pub trait Notifier {
    fn notify(&self, message: &str, notice: Notice);
}

/// Options for [`ImageTransform::compress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressOptions {
    pub target_size_kb: u32,
    pub preserve_metadata: bool,
}

/// Shrinks images to a target size.
#[async_trait]
pub trait ImageTransform: Send + Sync {
    async fn compress(&self, file: IncomingFile, options: CompressOptions) -> Result<IncomingFile>;
}

/// Returns images unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

#[async_trait]
impl ImageTransform for PassThrough {
    async fn compress(&self, file: IncomingFile, options: CompressOptions) -> Result<IncomingFile> {
        tracing::debug!(name = %file.name, target_size_kb = options.target_size_kb, "Image compression not available");
        Ok(file)
    }
}
