//! Local filesystem storage implementation.

use crate::traits::{AssetStore, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use coursemedia_core::MediaConfig;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Asset store backed by a directory of the local filesystem.
///
/// The destination tree may live on ephemeral storage that resets between
/// deployments, so [`AssetStore::ensure_directories`] is cheap and expected to
/// run before every write batch rather than once at startup.
#[derive(Clone)]
pub struct LocalStore {
    root: PathBuf,
    public_prefix: String,
}

impl LocalStore {
    /// Create a new store rooted at `root`, serving files under `public_prefix`
    /// (e.g. `/uploads`).
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into(),
        }
    }

    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(config.upload_root.clone(), config.public_prefix.clone())
    }

    /// Map a `subdir/filename` pair to a filesystem path, rejecting anything
    /// that could escape the upload root.
    fn resolve(&self, subdir: &str, filename: &str) -> StorageResult<PathBuf> {
        validate_segment(subdir)?;
        validate_segment(filename)?;
        if filename.contains('/') {
            return Err(StorageError::InvalidPath(format!(
                "Filename must not contain '/': {}",
                filename
            )));
        }
        Ok(self.root.join(subdir).join(filename))
    }

    /// Map a public relative URL back to a filesystem path.
    fn resolve_url(&self, relative_path: &str) -> StorageResult<PathBuf> {
        let rest = relative_path
            .strip_prefix(&self.public_prefix)
            .and_then(|r| r.strip_prefix('/'))
            .ok_or_else(|| {
                StorageError::InvalidPath(format!(
                    "Path does not start with {}/: {}",
                    self.public_prefix, relative_path
                ))
            })?;
        validate_segment(rest)?;
        Ok(self.root.join(rest))
    }

    fn relative_url(&self, subdir: &str, filename: &str) -> String {
        format!("{}/{}/{}", self.public_prefix, subdir, filename)
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;
        Ok(())
    }
}

fn validate_segment(segment: &str) -> StorageResult<()> {
    if segment.is_empty()
        || segment.starts_with('/')
        || segment.split('/').any(|part| part.is_empty() || part == "..")
    {
        return Err(StorageError::InvalidPath(format!(
            "Path segment contains invalid components: {}",
            segment
        )));
    }
    Ok(())
}

#[async_trait]
impl AssetStore for LocalStore {
    async fn ensure_directories(&self, subdirs: &[&str]) -> StorageResult<()> {
        for subdir in subdirs {
            validate_segment(subdir)?;
            let dir = self.root.join(subdir);
            fs::create_dir_all(&dir).await.map_err(|e| {
                StorageError::DirectoryFailed(format!(
                    "Failed to create directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    async fn write(&self, subdir: &str, filename: &str, data: Bytes) -> StorageResult<String> {
        let path = self.resolve(subdir, filename)?;
        let size = data.len();
        let start = std::time::Instant::now();

        self.write_file(&path, &data).await?;

        let url = self.relative_url(subdir, filename);
        tracing::info!(
            path = %path.display(),
            url = %url,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local store write successful"
        );
        Ok(url)
    }

    async fn write_all(
        &self,
        subdir: &str,
        files: Vec<(String, Bytes)>,
    ) -> StorageResult<Vec<String>> {
        let start = std::time::Instant::now();
        let mut urls = Vec::with_capacity(files.len());
        let mut writes = Vec::with_capacity(files.len());
        for (filename, data) in &files {
            let path = self.resolve(subdir, filename)?;
            urls.push(self.relative_url(subdir, filename));
            writes.push(async move {
                self.write_file(&path, data)
                    .await
                    .map_err(|e| (filename.clone(), e))
            });
        }

        let results = join_all(writes).await;
        let failures: Vec<String> = results
            .into_iter()
            .filter_map(|r| r.err())
            .map(|(filename, e)| format!("{}: {}", filename, e))
            .collect();

        if !failures.is_empty() {
            return Err(StorageError::WriteFailed(format!(
                "{} of {} writes failed: {}",
                failures.len(),
                files.len(),
                failures.join("; ")
            )));
        }

        tracing::info!(
            subdir = %subdir,
            count = files.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local store batch write successful"
        );
        Ok(urls)
    }

    async fn remove(&self, relative_path: &str) -> StorageResult<bool> {
        let path = self.resolve_url(relative_path)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), url = %relative_path, "Local store delete successful");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn exists(&self, relative_path: &str) -> StorageResult<bool> {
        let path = self.resolve_url(relative_path)?;
        Ok(fs::try_exists(&path).await?)
    }
}
