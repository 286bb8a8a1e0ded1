//! Error taxonomy for the upload pipeline.
//!
//! `Validation` errors are caller-correctable and their messages are safe to
//! surface verbatim. `Encode` and `Storage` errors are fatal for the request
//! and are not retried; callers log them server-side and return a generic
//! failure. Reclaim failures are reported through
//! [`ReclaimReport`](coursemedia_storage::ReclaimReport) instead and never
//! appear here.

use crate::validator::ValidationError;
use coursemedia_storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Image processing error: {0}")]
    Encode(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AssetError {
    pub fn encode(err: impl std::fmt::Display) -> Self {
        AssetError::Encode(err.to_string())
    }

    /// Whether the failure is correctable by the caller (HTTP 400 vs 500).
    pub fn is_caller_error(&self) -> bool {
        matches!(self, AssetError::Validation(_))
    }
}
