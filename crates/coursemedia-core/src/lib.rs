//! Coursemedia Core Library
//!
//! This crate provides the domain models, category policies, and configuration
//! shared across all coursemedia components.

pub mod config;
pub mod models;

// Re-export commonly used types
pub use config::{CategoryPolicy, ImageOptions, MediaConfig, PolicyTable};
pub use models::{
    AssetCategory, FileAssetDescriptor, FileClass, ImageAssetDescriptor, ImageCategory,
    UploadFile,
};
