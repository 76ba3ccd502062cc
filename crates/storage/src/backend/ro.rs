//! Read-only storage backend.
//!
//! This module provides a storage backend implementation that wraps other
//! implementations and prevents write operations from executing, but
//! indicating success on return. Used for dry runs.

use async_trait::async_trait;
use std::path::Path;

use crate::{BackendHandle, Entry, StorageBackend, backend::FileInfoStream, error::Result};

/// Read-only storage backend.
///
/// Wraps another backend and silently drops all write operations, logging an
/// [`info event`](tracing::Event).
#[derive(Clone)]
pub struct ReadOnlyBackend {
    inner: BackendHandle,
}
impl ReadOnlyBackend {
    pub fn new(inner: BackendHandle) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl StorageBackend for ReadOnlyBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn list_stream<'a>(&'a self, prefix: Option<&'a Path>) -> FileInfoStream<'a> {
        self.inner.list_stream(prefix)
    }

    async fn entry(&self, path: &Path) -> Result<Option<Entry>> {
        self.inner.entry(path).await
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.inner.read(path).await
    }

    async fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        tracing::info!(path = %path.display(), bytes = data.len(), "Skipping write during read-only mode");
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        tracing::info!(path = %path.display(), "Skipping directory creation during read-only mode");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LocalBackend;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_writes_are_dropped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let local = LocalBackend::new("vault", temp_dir.path()).unwrap();
        local.write(Path::new("Inbox.md"), b"# Inbox").await.unwrap();
        let backend = ReadOnlyBackend::new(Arc::new(local));

        backend.create_dir_all(Path::new("Daily/images")).await.unwrap();
        backend.write(Path::new("Daily/images/a.png"), b"png").await.unwrap();
        assert!(!backend.exists(Path::new("Daily/images")).await.unwrap());
        assert!(!backend.exists(Path::new("Daily/images/a.png")).await.unwrap());
        // Reads still go through.
        assert_eq!(backend.read(Path::new("Inbox.md")).await.unwrap(), b"# Inbox");
        assert_eq!(backend.list(None).await.unwrap().len(), 1);
        assert_eq!(backend.name(), "vault");
    }
}
