//! Storage abstraction trait
//!
//! This module defines the `AssetStore` trait implemented by storage backends.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Directory creation failed: {0}")]
    DirectoryFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction for the public upload tree.
///
/// The pipeline works against this trait so tests can substitute a temp-dir
/// backed store. All paths handed back to callers are relative URLs of the form
/// `{public_prefix}/{subdir}/{filename}`, never filesystem paths.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Create the given sub-directories (and missing parents) under the upload
    /// root. Idempotent; safe to call before every write batch.
    async fn ensure_directories(&self, subdirs: &[&str]) -> StorageResult<()>;

    /// Write one file and return its public relative URL.
    async fn write(&self, subdir: &str, filename: &str, data: Bytes) -> StorageResult<String>;

    /// Write a batch of files into one sub-directory. The writes are independent
    /// and may run concurrently; any individual failure is surfaced as a single
    /// aggregate error and the caller must treat the whole batch as failed.
    /// Returns relative URLs in input order.
    async fn write_all(
        &self,
        subdir: &str,
        files: Vec<(String, Bytes)>,
    ) -> StorageResult<Vec<String>>;

    /// Remove the file at a public relative URL. Returns `Ok(true)` if a file
    /// was removed and `Ok(false)` if no file was present.
    async fn remove(&self, relative_path: &str) -> StorageResult<bool>;

    /// Check whether a file exists at a public relative URL.
    async fn exists(&self, relative_path: &str) -> StorageResult<bool>;
}
