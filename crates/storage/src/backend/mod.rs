//! Storage backend trait and implementations.
//!
//! This module defines the `StorageBackend` trait, the vault as seen by the
//! rest of daybook: a tree of notes and attachments addressed by paths
//! relative to the vault root.

mod local;
#[cfg(feature = "mock")]
mod mock;
mod ro;

pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::MockBackend;
pub use self::ro::ReadOnlyBackend;
use crate::error::Result;
use crate::file::{Entry, FileInfo};
use async_trait::async_trait;
use futures::{Stream, TryStreamExt};
use std::path::Path;
use std::pin::Pin;

type FileInfoStream<'a> = Pin<Box<dyn Stream<Item = Result<FileInfo>> + Send + 'a>>;

/// Unified interface for vault storage.
///
/// All operations are asynchronous; the intake pipeline awaits each one
/// before moving on, so implementations never see overlapping calls from a
/// single batch.
///
/// # Path Handling
/// All paths are relative to the vault root and must be validated using
/// [`validate_path`](crate::validate_path) before use. Implementations should
/// enforce this validation.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use daybook_storage::{backend::StorageBackend, error::Result};
///
/// async fn attach_once(backend: &dyn StorageBackend, path: &Path, data: &[u8]) -> Result<bool> {
///     if backend.exists(path).await? {
///         return Ok(false);
///     }
///     if let Some(parent) = path.parent() {
///         backend.create_dir_all(parent).await?;
///     }
///     backend.write(path, data).await?;
///     Ok(true)
/// }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Name of the configured backend, used for logging only.
    fn name(&self) -> &str;

    /// List all files matching an optional prefix.
    ///
    /// Default implementation of this method is to collect all the results
    /// from [`list_stream()`](Self::list_stream) into a [`Vec`] before
    /// returning.
    async fn list(&self, prefix: Option<&Path>) -> Result<Vec<FileInfo>> {
        self.list_stream(prefix).try_collect().await
    }

    /// Stream file metadata matching an optional prefix.
    ///
    /// Only files are yielded, never directories. If a prefix is provided,
    /// only files whose paths start with the prefix (component-wise) are
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use futures::TryStreamExt;
    /// use std::path::Path;
    /// # use daybook_storage::{backend::StorageBackend, error::Result};
    /// # async fn example(backend: &dyn StorageBackend) -> Result<()> {
    ///
    /// let mut stream = backend.list_stream(Some(Path::new("Daily/2024")));
    /// while let Some(info) = stream.try_next().await? {
    ///     println!("{}: {} bytes", info.path.display(), info.size);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    fn list_stream<'a>(&'a self, prefix: Option<&'a Path>) -> FileInfoStream<'a>;

    /// Look up whatever occupies `path`.
    ///
    /// Returns `Ok(None)` when nothing exists there; that is not an error.
    async fn entry(&self, path: &Path) -> Result<Option<Entry>>;

    /// Check if a file or directory exists.
    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(self.entry(path).await?.is_some())
    }

    /// Read file contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write file contents.
    ///
    /// Creates a new file or overwrites an existing file with the provided
    /// data. Callers that must not clobber existing entries check
    /// [`entry()`](Self::entry) first.
    ///
    /// # Notes
    /// - Implementations should create parent directories as needed.
    ///
    /// ```no_run
    /// use std::path::Path;
    /// # use daybook_storage::{backend::StorageBackend, error::Result};
    /// # async fn example(backend: &dyn StorageBackend) -> Result<()> {
    /// backend.write(Path::new("Daily/2024/Jan/images/2024-01-15-image.png"), b"\x89PNG").await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn write(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Create a directory and any missing parents.
    ///
    /// Idempotent: an existing directory is not an error. Returns
    /// [`WrongEntryType`](crate::error::ErrorKind::WrongEntryType) when a file
    /// is in the way.
    async fn create_dir_all(&self, path: &Path) -> Result<()>;
}
