//! Upload pipeline: validate → name → render → store.

pub mod pipeline;

pub use pipeline::{AssetDescriptor, ImageUploadOptions, UploadPipeline, UploadRequest};
