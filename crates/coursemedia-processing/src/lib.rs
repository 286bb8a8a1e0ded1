//! Coursemedia Processing Library
//!
//! Validation, naming, geometry planning, and derivative rendering for uploaded
//! assets, plus the upload pipeline that ties them to an
//! [`AssetStore`](coursemedia_storage::AssetStore).
//!
//! Images produce four derivatives sharing one stem: `{stem}.jpg`,
//! `{stem}_thumb.jpg`, `{stem}.webp`, `{stem}_thumb.webp`. Course-content files
//! are stored as-is under `course-content/{class}/`. The reclaimer in
//! `coursemedia-storage` recomputes derivative paths from this convention.

pub mod error;
pub mod image;
pub mod naming;
pub mod upload;
pub mod urls;
pub mod validator;

// Re-export commonly used types
pub use crate::image::geometry::{Dimensions, GeometryPlanner, ResizePlan};
pub use error::AssetError;
pub use naming::NameGenerator;
pub use upload::pipeline::{AssetDescriptor, ImageUploadOptions, UploadPipeline, UploadRequest};
pub use validator::{AssetValidator, Resolution, ValidationError};
