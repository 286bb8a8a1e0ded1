//! Coursemedia Storage Library
//!
//! This crate provides the `AssetStore` abstraction over the public upload tree,
//! its local-filesystem implementation, and the derivative reclaimer.
//!
//! # Path format
//!
//! Relative URLs are the only representation callers may depend on:
//! `{public_prefix}/{subdir}/{filename}`, e.g. `/uploads/blog/photo_ab12cd34.jpg`.
//! Sub-directories and filenames must not contain `..` or a leading `/`; the local
//! backend rejects anything that would resolve outside the upload root.

pub mod local;
pub mod reclaim;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStore;
pub use reclaim::{AssetReclaimer, ReclaimReport};
pub use traits::{AssetStore, StorageError, StorageResult};
