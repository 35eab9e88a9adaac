//! The [`Storage`] handle: sandboxed reads, atomic writes and JSON document helpers.

use crate::builder::StorageBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance;
use crate::security;
use serde::Serialize;
use std::io::ErrorKind;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Marker embedded in temp file names; also what the startup sweep looks for.
pub(crate) const TMP_MARKER: &str = ".sbtmp.";

/// The shared state behind a [`Storage`] handle.
#[derive(Debug)]
pub struct StorageInner {
    /// The canonicalized physical root of the sandbox.
    pub(crate) root: PathBuf,
    /// Source of unique temp file suffixes.
    pub(crate) tmp_counter: AtomicU64,
}

/// A cheaply cloneable handle to a sandboxed directory of documents.
///
/// Writes go through a temp file and an atomic rename. Two concurrent writers of the
/// same document never corrupt it, but the last rename wins: callers that do
/// read-modify-write must serialize themselves.
///
/// # Example
///
/// ```rust
/// use slotbook_storage::{Storage, StorageError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), StorageError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     let storage = Storage::builder().root(tmp.path()).connect().await?;
///
///     storage.write("config.json", br#"{"perDayLimit": 5}"#).await?;
///     let raw = storage.read("config.json").await?;
///     assert!(raw.starts_with(b"{"));
///
///     assert!(storage.resolve("../escape.json").is_err());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Storage {
    pub(crate) inner: Arc<StorageInner>,
}

impl Deref for Storage {
    type Target = StorageInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Storage {
    #[must_use = "The storage engine is not initialized until you call .connect()"]
    pub fn builder() -> StorageBuilder {
        StorageBuilder::new()
    }

    /// The canonical sandbox root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a relative path to a physical path inside the sandbox.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PathTraversalAttempt`] for absolute paths or paths that
    /// would leave the root. Returns [`StorageError::Io`] if an existing ancestor
    /// cannot be inspected.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
        security::resolve_path(&self.root, path)
    }

    /// Reads a whole document.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::FileNotFound`] if the document does not exist and
    /// [`StorageError::Io`] for any other read failure (including the path being a
    /// directory).
    pub async fn read(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, StorageError> {
        let resolved = self.resolve(path)?;

        match fs::read(&resolved).await {
            Ok(data) => Ok(data),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StorageError::FileNotFound {
                message: resolved.display().to_string().into(),
                context: None,
            }),
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("Read failed: {}", resolved.display()).into()),
            }),
        }
    }

    /// Like [`Storage::read`], but a missing document is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] for failures other than "not found".
    pub async fn read_optional(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        match self.read(path).await {
            Ok(data) => Ok(Some(data)),
            Err(StorageError::FileNotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Serializes `value` as pretty JSON and writes it atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Json`] if serialization fails and [`StorageError::Io`]
    /// if the write or the rename fails.
    pub async fn save_json<T>(&self, path: impl AsRef<Path>, value: &T) -> Result<(), StorageError>
    where
        T: Serialize + ?Sized,
    {
        let data = serde_json::to_vec_pretty(value).context("Failed to encode document")?;
        self.write(path, &data).await
    }

    /// Writes a whole document atomically.
    ///
    /// 1. Data goes to a unique temp file next to the target (`<name>.sbtmp.<n>`).
    /// 2. The temp file is `fsync`ed.
    /// 3. The temp file is renamed over the target; the parent directory is synced.
    ///
    /// On failure the temp file is removed and the previous document stays intact.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PathTraversalAttempt`] if the path escapes the sandbox
    /// and [`StorageError::Io`] for disk, permission or rename failures.
    pub async fn write(&self, path: impl AsRef<Path>, data: &[u8]) -> Result<(), StorageError> {
        let resolved = self.resolve(path)?;

        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create parent of {}", resolved.display()))?;
        }

        let temp = unique_tmp_path(&resolved, &self.tmp_counter);

        if let Err(err) = Self::write_and_swap(&temp, &resolved, data).await {
            if let Err(cleanup) = fs::remove_file(&temp).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(path = %temp.display(), error = %cleanup, "Failed to remove temp file");
                }
            }
            return Err(err);
        }

        if let Some(parent) = resolved.parent() {
            Self::sync_dir(parent).await;
        }

        debug!(path = %resolved.display(), bytes = data.len(), "Document saved atomically");
        Ok(())
    }

    /// Removes stale temp files left behind by interrupted writes.
    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.root).await;
    }

    async fn write_and_swap(temp: &Path, target: &Path, data: &[u8]) -> Result<(), StorageError> {
        let mut file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(temp)
            .await
            .context(format!("Temp creation failed: {}", temp.display()))?;
        file.write_all(data).await.context("Write failed")?;
        file.sync_all().await.context("Hardware sync failed")?;
        drop(file);

        fs::rename(temp, target).await.context(format!(
            "Atomic swap failed: {} -> {}",
            temp.display(),
            target.display()
        ))
    }

    async fn sync_dir(path: &Path) {
        match fs::File::open(path).await {
            Ok(dir) => {
                if let Err(err) = dir.sync_all().await {
                    debug!(path = %path.display(), error = %err, "Directory sync failed");
                }
            },
            Err(err) => {
                debug!(path = %path.display(), error = %err, "Directory open failed");
            },
        }
    }
}

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let n = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("document");
    target.with_file_name(format!("{file_name}{TMP_MARKER}{}.{n}", std::process::id()))
}
