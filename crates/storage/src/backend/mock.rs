//! In-memory storage backend for testing.

use super::FileInfoStream;
use crate::error::{ErrorKind, Result};
use crate::file::{Entry, FileInfo};
use crate::path::validate as validate_path;
use async_stream::stream;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::StorageBackend;

#[derive(Default)]
struct Vault {
    files: HashMap<PathBuf, (OffsetDateTime, Vec<u8>)>,
    dirs: BTreeSet<PathBuf>,
    failing: HashSet<PathBuf>,
    writes: Vec<PathBuf>,
}
impl Vault {
    fn add_ancestors(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(dir) = parent.filter(|p| !p.as_os_str().is_empty()) {
            self.dirs.insert(dir.to_path_buf());
            parent = dir.parent();
        }
    }
}

/// In-memory storage backend for testing.
///
/// Files and directories live behind a [`RwLock`], so all trait methods can
/// operate on `&self`. Writes to paths registered with
/// [`with_failing_writes`](Self::with_failing_writes) fail, and every
/// successful write is recorded for later inspection.
///
/// # Examples
///
/// ```
/// use daybook_storage::backend::{MockBackend, StorageBackend};
/// use std::path::Path;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> daybook_storage::error::Result<()> {
/// let backend = MockBackend::with_files([
///     ("Daily/2024/Jan/2024-01-15.md", b"# Monday"),
/// ]);
/// assert!(backend.exists(Path::new("Daily/2024/Jan")).await?);
///
/// backend.write(Path::new("Daily/2024/Jan/images/a.png"), b"png").await?;
/// assert_eq!(backend.written().await.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MockBackend {
    name: String,
    vault: RwLock<Vault>,
}

impl MockBackend {
    /// Create a mock backend pre-populated with files.
    ///
    /// Parent directories of every file are created too. Panics if any path
    /// fails validation: if test setup is wrong, then test should not pass.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>) -> Self {
        let mut vault = Vault::default();
        let now = OffsetDateTime::now_utc();
        for (path, data) in files {
            let path = path.into();
            let Ok(validated) = validate_path(&path) else {
                panic!("MockBackend::with_files: invalid path {}", path.display());
            };
            vault.add_ancestors(&validated);
            vault.files.insert(validated, (now, data.into()));
        }
        Self {
            name: "mock".to_string(),
            vault: RwLock::new(vault),
        }
    }

    /// Make every write to one of `paths` fail with a backend error.
    pub fn with_failing_writes(mut self, paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.vault.get_mut().failing.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Paths successfully written through [`StorageBackend::write`], in order.
    pub async fn written(&self) -> Vec<PathBuf> {
        self.vault.read().await.writes.clone()
    }

    /// Every directory currently in the vault, sorted.
    pub async fn directories(&self) -> Vec<PathBuf> {
        self.vault.read().await.dirs.iter().cloned().collect()
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        let files: [(&str, &str); 0] = [];
        Self::with_files(files)
    }
}

#[async_trait]
impl StorageBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_stream<'a>(&'a self, prefix: Option<&'a Path>) -> FileInfoStream<'a> {
        let validated_prefix = match prefix.map(validate_path).transpose() {
            Ok(pfx) => pfx,
            Err(e) => return Box::pin(futures::stream::once(async { Err(e) })),
        };

        Box::pin(stream! {
            // Snapshot matching entries under the read lock, then drop it
            // before yielding to avoid holding the lock across yield points.
            let entries: Vec<FileInfo> = {
                let guard = self.vault.read().await;
                let mut entries: Vec<_> = guard
                    .files
                    .iter()
                    .filter(|(path, _)| match &validated_prefix {
                        Some(pfx) => path.starts_with(pfx),
                        None => true,
                    })
                    .map(|(path, (inserted, data))| FileInfo::new(path.clone(), data.len() as u64, *inserted))
                    .collect();
                entries.sort_by(|a, b| a.path.cmp(&b.path));
                entries
            };
            for info in entries {
                yield Ok(info);
            }
        })
    }

    async fn entry(&self, path: &Path) -> Result<Option<Entry>> {
        let path = validate_path(path)?;
        let guard = self.vault.read().await;
        if let Some((inserted, data)) = guard.files.get(&path) {
            return Ok(Some(Entry::File(FileInfo::new(path, data.len() as u64, *inserted))));
        }
        Ok(guard.dirs.contains(&path).then_some(Entry::Directory(path)))
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let path = validate_path(path)?;
        let (_inserted, data) =
            self.vault.read().await.files.get(&path).cloned().ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(path)))?;
        Ok(data)
    }

    async fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let path = validate_path(path)?;
        let mut guard = self.vault.write().await;
        if guard.failing.contains(&path) {
            exn::bail!(ErrorKind::BackendError(format!("injected write failure: {}", path.display())));
        }
        if guard.dirs.contains(&path) {
            exn::bail!(ErrorKind::WrongEntryType(path));
        }
        guard.add_ancestors(&path);
        guard.writes.push(path.clone());
        guard.files.insert(path, (OffsetDateTime::now_utc(), data.to_vec()));
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        let path = validate_path(path)?;
        let mut guard = self.vault.write().await;
        if guard.files.contains_key(&path) {
            exn::bail!(ErrorKind::WrongEntryType(path));
        }
        guard.add_ancestors(&path);
        guard.dirs.insert(path);
        Ok(())
    }
}
