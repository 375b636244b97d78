use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tokio::fs::{self as async_fs, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};

use super::sanitize::{StoredName, STAGING_DIR};
use crate::models::{GatewayError, GatewayResult, StoredFile};

/// Flat directory store: one file per name, directly under the root.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    staging: PathBuf,
}

impl FileStore {
    /// Create the store directory if needed and pin it to its canonical path.
    pub async fn open(root: impl AsRef<Path>) -> GatewayResult<Self> {
        let root = root.as_ref();
        async_fs::create_dir_all(root).await?;
        let root = async_fs::canonicalize(root).await?;

        let staging = root.join(STAGING_DIR);
        async_fs::create_dir_all(&staging).await?;

        info!(root = %root.display(), "File store ready");
        Ok(FileStore { root, staging })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a sanitized name to its path, enforcing root containment.
    pub async fn resolve(&self, name: &StoredName) -> GatewayResult<PathBuf> {
        let candidate = self.root.join(name.as_str());
        if candidate.parent() != Some(self.root.as_path()) {
            return Err(GatewayError::InvalidFilename(name.to_string()));
        }

        // An existing entry may be a symlink planted in the store
        match async_fs::canonicalize(&candidate).await {
            Ok(real) if real.parent() == Some(self.root.as_path()) => Ok(candidate),
            Ok(real) => {
                debug!(name = %name, target = %real.display(), "Entry resolves outside the store");
                Err(GatewayError::InvalidFilename(name.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(candidate),
            Err(e) => Err(e.into()),
        }
    }

    /// Start a batch of uploads that becomes visible only on commit.
    pub fn begin_upload(&self) -> UploadBatch<'_> {
        UploadBatch {
            store: self,
            staged: Vec::new(),
        }
    }

    /// Names of all regular files in the store, in directory order.
    pub async fn list(&self) -> GatewayResult<Vec<StoredName>> {
        let mut names = Vec::new();
        let mut entries = async_fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(name) => names.push(StoredName::from_listing(name)),
                Err(raw) => debug!(name = ?raw, "Skipping non UTF-8 file name"),
            }
        }

        Ok(names)
    }

    /// Open a stored file for reading, returning the handle and its size.
    pub async fn open_file(&self, name: &StoredName) -> GatewayResult<(File, u64)> {
        let path = self.resolve(name).await?;

        let metadata = match async_fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(GatewayError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        if !metadata.is_file() {
            return Err(GatewayError::NotFound(name.to_string()));
        }

        let file = File::open(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => GatewayError::NotFound(name.to_string()),
            _ => GatewayError::Io(e),
        })?;

        Ok((file, metadata.len()))
    }

    /// Whether the root is still a directory we can see
    pub async fn is_available(&self) -> bool {
        async_fs::metadata(&self.root)
            .await
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false)
    }
}

/// An upload body being written to a temporary file in the staging area
#[derive(Debug)]
pub struct StagedFile {
    name: StoredName,
    target: PathBuf,
    temp: NamedTempFile,
    writer: File,
    size: u64,
}

impl StagedFile {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> GatewayResult<()> {
        self.writer.write_all(chunk).await?;
        self.size += chunk.len() as u64;
        Ok(())
    }

    pub fn name(&self) -> &StoredName {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// A set of staged uploads from one request.
///
/// Dropping the batch without committing deletes every staged file, so a
/// request that fails part-way leaves the store untouched.
#[derive(Debug)]
pub struct UploadBatch<'a> {
    store: &'a FileStore,
    staged: Vec<StagedFile>,
}

impl<'a> UploadBatch<'a> {
    /// Reserve a staging file for `name` and return it for writing.
    pub async fn stage(&mut self, name: StoredName) -> GatewayResult<&mut StagedFile> {
        let target = self.store.resolve(&name).await?;
        let temp = NamedTempFile::new_in(&self.store.staging)?;
        let writer = File::from_std(temp.as_file().try_clone()?);

        debug!(name = %name, staged = %temp.path().display(), "Staging upload");
        self.staged.push(StagedFile {
            name,
            target,
            temp,
            writer,
            size: 0,
        });

        let last = self.staged.len() - 1;
        Ok(&mut self.staged[last])
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Move every staged file onto its final name, in staging order.
    ///
    /// Each rename is atomic; a later name replaces an earlier one. Only a
    /// failing rename can leave the batch partially committed.
    pub async fn commit(mut self) -> GatewayResult<Vec<StoredFile>> {
        for staged in &mut self.staged {
            staged.writer.flush().await?;
            staged.writer.sync_data().await?;
        }

        let total = self.staged.len();
        let mut committed = Vec::with_capacity(total);

        for staged in self.staged.drain(..) {
            let StagedFile {
                name,
                target,
                temp,
                writer,
                size,
            } = staged;
            drop(writer);

            if let Err(persist_err) = temp.persist(&target) {
                let err = persist_err.error;
                error!(
                    name = %name,
                    committed = committed.len(),
                    total,
                    error = %err,
                    "Upload batch partially committed"
                );
                return Err(GatewayError::Io(err));
            }

            committed.push(StoredFile {
                name: name.into_string(),
                size,
            });
        }

        Ok(committed)
    }
}
