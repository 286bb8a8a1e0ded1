//! The upload pipeline.
//!
//! Images: validate → name → decode + plan geometry → render four derivatives
//! concurrently → write all four (all-or-nothing) → descriptor with four URLs.
//! Course-content files: validate + classify → name → single write → descriptor.
//!
//! Every URL in a returned descriptor points to a file that was written before
//! the descriptor was returned. A failed encode or a partial write batch fails
//! the whole upload; no URL from a failed upload is ever handed out.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::task;

use coursemedia_core::{
    AssetCategory, FileAssetDescriptor, FileClass, ImageAssetDescriptor, ImageCategory,
    ImageOptions, MediaConfig, UploadFile,
};
use coursemedia_storage::{AssetReclaimer, AssetStore, ReclaimReport};

use crate::error::AssetError;
use crate::image::encoder::DerivativeEncoder;
use crate::image::geometry::{Dimensions, GeometryPlanner};
use crate::naming::NameGenerator;
use crate::validator::{AssetValidator, Resolution};

use image::GenericImageView;

/// Per-call overrides for the image pipeline. Unset fields fall back to the
/// configured [`ImageOptions`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageUploadOptions {
    pub quality: Option<u8>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub thumbnail_width: Option<u32>,
    pub thumbnail_height: Option<u32>,
}

/// One upload request as handed over by a route handler.
#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub file: UploadFile,
    pub category: AssetCategory,
    /// Owner identifiers, used only for filename namespacing.
    pub course_id: Option<String>,
    pub lesson_id: Option<String>,
    pub options: ImageUploadOptions,
}

impl UploadRequest {
    pub fn new(file: UploadFile, category: AssetCategory) -> Self {
        Self {
            file,
            category,
            course_id: None,
            lesson_id: None,
            options: ImageUploadOptions::default(),
        }
    }

    pub fn with_course(mut self, course_id: impl Into<String>) -> Self {
        self.course_id = Some(course_id.into());
        self
    }

    pub fn with_lesson(mut self, lesson_id: impl Into<String>) -> Self {
        self.lesson_id = Some(lesson_id.into());
        self
    }

    pub fn with_options(mut self, options: ImageUploadOptions) -> Self {
        self.options = options;
        self
    }
}

/// Result of a successful upload.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum AssetDescriptor {
    Image(ImageAssetDescriptor),
    File(FileAssetDescriptor),
}

/// Upload pipeline over an [`AssetStore`].
///
/// Holds no per-request state; concurrent requests share nothing but the
/// store's directory tree, and the name generator's random token keeps
/// same-named uploads from colliding.
pub struct UploadPipeline {
    store: Arc<dyn AssetStore>,
    reclaimer: AssetReclaimer,
    validator: AssetValidator,
    image_defaults: ImageOptions,
}

impl UploadPipeline {
    pub fn new(store: Arc<dyn AssetStore>, config: &MediaConfig) -> Self {
        Self {
            reclaimer: AssetReclaimer::new(store.clone()),
            validator: AssetValidator::new(config.policies.clone()),
            image_defaults: config.image,
            store,
        }
    }

    /// Upload entry point. Validation runs before any encode or write work;
    /// the resolved category/classification picks the pipeline.
    pub async fn upload(&self, request: UploadRequest) -> Result<AssetDescriptor, AssetError> {
        let resolution = self.validator.validate(&request.file, request.category)?;
        match resolution {
            Resolution::Image(image_category) => {
                let descriptor = self
                    .process_image(request.file, image_category, request.options)
                    .await?;
                Ok(AssetDescriptor::Image(descriptor))
            }
            Resolution::File(class) => {
                let prefix = file_prefix(
                    request.category,
                    request.course_id.as_deref(),
                    request.lesson_id.as_deref(),
                );
                let descriptor = self.store_file(request.file, class, &prefix).await?;
                Ok(AssetDescriptor::File(descriptor))
            }
        }
    }

    /// Delete every derivative of an image asset, keyed by its base path.
    /// Idempotent; individual missing files are not failures.
    pub async fn delete_image(&self, base_relative_path: &str) -> ReclaimReport {
        self.reclaimer.delete_all_variants(base_relative_path).await
    }

    /// Delete a stored course-content file. Missing files are not failures.
    pub async fn delete_file(&self, relative_path: &str) -> ReclaimReport {
        self.reclaimer.delete_file(relative_path).await
    }

    async fn process_image(
        &self,
        file: UploadFile,
        category: ImageCategory,
        options: ImageUploadOptions,
    ) -> Result<ImageAssetDescriptor, AssetError> {
        let start = std::time::Instant::now();
        let defaults = self.image_defaults;
        let quality = options.quality.unwrap_or(defaults.quality);
        let thumb_quality = defaults.thumb_quality;
        let max_width = options.max_width.unwrap_or(defaults.max_width);
        let max_height = options.max_height.unwrap_or(defaults.max_height);
        let thumb_width = options.thumbnail_width.unwrap_or(defaults.thumb_width);
        let thumb_height = options.thumbnail_height.unwrap_or(defaults.thumb_height);

        let prefix = format!("{}_", category.subdir());
        let generated = NameGenerator::generate(&file.original_filename, &prefix);
        let stem = generated
            .rsplit_once('.')
            .map(|(s, _)| s.to_string())
            .unwrap_or(generated);

        // Image decode is CPU-bound; run off the async pool.
        let data = file.data;
        let img = task::spawn_blocking(move || DerivativeEncoder::decode(&data))
            .await
            .map_err(|e| AssetError::Encode(format!("Decode task failed: {}", e)))?
            .map_err(|e| AssetError::Encode(format!("Failed to decode image: {}", e)))?;

        let (src_width, src_height) = img.dimensions();
        let plan = GeometryPlanner::plan(
            src_width,
            src_height,
            max_width,
            max_height,
            thumb_width,
            thumb_height,
        )
        .map_err(AssetError::encode)?;

        // The renderer clamps every target to the source (never enlarges), so
        // the descriptor must report the clamped dimensions, not the raw plan:
        // a source exceeding only one bound gets a plan wider or taller than
        // the file that is actually written.
        let main_dims = Dimensions::new(
            plan.main.width.min(src_width),
            plan.main.height.min(src_height),
        );

        // The four encodes are independent; fan out and join. Any failure
        // fails the upload before anything is written, keeping the
        // all-four-or-none naming invariant the reclaimer depends on.
        let img = Arc::new(img);
        let jpeg_main = spawn_encode(&img, plan.main, quality, Encoding::Jpeg);
        let jpeg_thumb = spawn_encode(&img, plan.thumb, thumb_quality, Encoding::Jpeg);
        let webp_main = spawn_encode(&img, plan.main, quality, Encoding::WebP);
        let webp_thumb = spawn_encode(&img, plan.thumb, thumb_quality, Encoding::WebP);

        let (jpeg_main, jpeg_thumb, webp_main, webp_thumb) =
            tokio::try_join!(jpeg_main, jpeg_thumb, webp_main, webp_thumb)
                .map_err(|e| AssetError::Encode(format!("Encode task failed: {}", e)))?;
        let jpeg_main = jpeg_main.map_err(AssetError::encode)?;
        let jpeg_thumb = jpeg_thumb.map_err(AssetError::encode)?;
        let webp_main = webp_main.map_err(AssetError::encode)?;
        let webp_thumb = webp_thumb.map_err(AssetError::encode)?;

        let subdir = category.subdir();
        self.store.ensure_directories(&[subdir]).await?;

        let primary_size = jpeg_main.len();
        let urls = self
            .store
            .write_all(
                subdir,
                vec![
                    (format!("{}.jpg", stem), jpeg_main),
                    (format!("{}_thumb.jpg", stem), jpeg_thumb),
                    (format!("{}.webp", stem), webp_main),
                    (format!("{}_thumb.webp", stem), webp_thumb),
                ],
            )
            .await?;
        let [original, thumbnail, webp, webp_thumbnail]: [String; 4] = urls
            .try_into()
            .map_err(|_| AssetError::Encode("Write batch returned wrong arity".to_string()))?;

        tracing::info!(
            category = subdir,
            filename = %format!("{}.jpg", stem),
            size_bytes = primary_size,
            width = main_dims.width,
            height = main_dims.height,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image upload processed"
        );

        Ok(ImageAssetDescriptor {
            original,
            thumbnail,
            webp,
            webp_thumbnail,
            filename: format!("{}.jpg", stem),
            size: primary_size,
            width: main_dims.width,
            height: main_dims.height,
            uploaded_at: Utc::now(),
        })
    }

    async fn store_file(
        &self,
        file: UploadFile,
        class: FileClass,
        prefix: &str,
    ) -> Result<FileAssetDescriptor, AssetError> {
        let start = std::time::Instant::now();
        let filename = NameGenerator::generate(&file.original_filename, prefix);
        let subdir = format!("course-content/{}", class.subdir());

        self.store.ensure_directories(&[subdir.as_str()]).await?;

        let size = file.data.len();
        let url = self
            .store
            .write(&subdir, &filename, bytes::Bytes::from(file.data))
            .await?;

        tracing::info!(
            class = class.as_str(),
            filename = %filename,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Course content upload stored"
        );

        Ok(FileAssetDescriptor {
            url,
            filename,
            size,
            class,
            original_name: file.original_filename,
            uploaded_at: Utc::now(),
        })
    }
}

enum Encoding {
    Jpeg,
    WebP,
}

fn spawn_encode(
    img: &Arc<image::DynamicImage>,
    target: Dimensions,
    quality: u8,
    encoding: Encoding,
) -> task::JoinHandle<anyhow::Result<bytes::Bytes>> {
    let img = Arc::clone(img);
    task::spawn_blocking(move || {
        let resized = DerivativeEncoder::fit_within(&img, target);
        match encoding {
            Encoding::Jpeg => DerivativeEncoder::encode_jpeg(&resized, quality),
            Encoding::WebP => DerivativeEncoder::encode_webp(&resized, quality),
        }
    })
}

/// Filename prefix for course-content assets: owner identifiers when present,
/// otherwise the category discriminator.
fn file_prefix(
    category: AssetCategory,
    course_id: Option<&str>,
    lesson_id: Option<&str>,
) -> String {
    match (course_id, lesson_id) {
        (Some(course), Some(lesson)) => format!("course_{}_lesson_{}_", course, lesson),
        (Some(course), None) => format!("course_{}_", course),
        (None, _) => format!("{}_", category.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_prefix_with_lesson() {
        assert_eq!(
            file_prefix(AssetCategory::CourseVideo, Some("42"), Some("7")),
            "course_42_lesson_7_"
        );
    }

    #[test]
    fn test_file_prefix_course_only() {
        assert_eq!(
            file_prefix(AssetCategory::CourseVideo, Some("42"), None),
            "course_42_"
        );
    }

    #[test]
    fn test_file_prefix_falls_back_to_category() {
        assert_eq!(
            file_prefix(AssetCategory::CourseArchive, None, None),
            "course-archive_"
        );
    }
}
