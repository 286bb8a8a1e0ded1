//! Configuration module
//!
//! Category policies and pipeline settings. Policies are plain data injected into
//! the validator at construction; nothing here is global mutable state, so tests
//! and per-environment deployments can substitute their own tables.

use std::env;
use std::path::PathBuf;

use crate::models::FileClass;

const MB: u64 = 1024 * 1024;

const DEFAULT_UPLOAD_ROOT: &str = "public/uploads";
const DEFAULT_PUBLIC_PREFIX: &str = "/uploads";

/// Validation policy for one category of upload.
#[derive(Clone, Debug)]
pub struct CategoryPolicy {
    /// Lowercased extensions without the leading dot.
    pub allowed_extensions: Vec<String>,
    /// Lowercased MIME types.
    pub allowed_content_types: Vec<String>,
    pub max_bytes: u64,
}

impl CategoryPolicy {
    pub fn new(extensions: &[&str], content_types: &[&str], max_bytes: u64) -> Self {
        Self {
            allowed_extensions: extensions.iter().map(|s| s.to_string()).collect(),
            allowed_content_types: content_types.iter().map(|s| s.to_string()).collect(),
            max_bytes,
        }
    }

    /// The configured maximum in whole megabytes, for user-facing messages.
    pub fn max_mb(&self) -> u64 {
        self.max_bytes / MB
    }
}

/// Policy lookup for every category the pipeline accepts.
#[derive(Clone, Debug)]
pub struct PolicyTable {
    image: CategoryPolicy,
    video: CategoryPolicy,
    pdf: CategoryPolicy,
    document: CategoryPolicy,
    file_image: CategoryPolicy,
    audio: CategoryPolicy,
    archive: CategoryPolicy,
}

impl PolicyTable {
    /// Policy for the image derivative pipeline (blog, avatars, thumbnails).
    pub fn image(&self) -> &CategoryPolicy {
        &self.image
    }

    /// Policy for a course-content file class.
    pub fn for_class(&self, class: FileClass) -> &CategoryPolicy {
        match class {
            FileClass::Video => &self.video,
            FileClass::Pdf => &self.pdf,
            FileClass::Document => &self.document,
            FileClass::Image => &self.file_image,
            FileClass::Audio => &self.audio,
            FileClass::Other => &self.archive,
        }
    }

    pub fn with_image_policy(mut self, policy: CategoryPolicy) -> Self {
        self.image = policy;
        self
    }

    pub fn with_class_policy(mut self, class: FileClass, policy: CategoryPolicy) -> Self {
        match class {
            FileClass::Video => self.video = policy,
            FileClass::Pdf => self.pdf = policy,
            FileClass::Document => self.document = policy,
            FileClass::Image => self.file_image = policy,
            FileClass::Audio => self.audio = policy,
            FileClass::Other => self.archive = policy,
        }
        self
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self {
            image: CategoryPolicy::new(
                &["jpg", "jpeg", "png", "webp", "gif"],
                &[
                    "image/jpeg",
                    "image/jpg",
                    "image/png",
                    "image/webp",
                    "image/gif",
                ],
                10 * MB,
            ),
            video: CategoryPolicy::new(
                &["mp4", "avi", "mov", "wmv", "flv", "webm", "mkv"],
                &[
                    "video/mp4",
                    "video/avi",
                    "video/quicktime",
                    "video/x-ms-wmv",
                    "video/x-flv",
                    "video/webm",
                    "video/x-matroska",
                ],
                500 * MB,
            ),
            pdf: CategoryPolicy::new(&["pdf"], &["application/pdf"], 50 * MB),
            document: CategoryPolicy::new(
                &["doc", "docx", "ppt", "pptx", "xls", "xlsx", "txt", "rtf"],
                &[
                    "application/msword",
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                    "application/vnd.ms-powerpoint",
                    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
                    "application/vnd.ms-excel",
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                    "text/plain",
                    "application/rtf",
                ],
                20 * MB,
            ),
            file_image: CategoryPolicy::new(
                &["jpg", "jpeg", "png", "gif", "webp", "svg"],
                &[
                    "image/jpeg",
                    "image/png",
                    "image/gif",
                    "image/webp",
                    "image/svg+xml",
                ],
                10 * MB,
            ),
            audio: CategoryPolicy::new(
                &["mp3", "wav", "ogg", "m4a", "aac"],
                &[
                    "audio/mpeg",
                    "audio/wav",
                    "audio/ogg",
                    "audio/mp4",
                    "audio/aac",
                ],
                100 * MB,
            ),
            archive: CategoryPolicy::new(
                &["zip", "rar", "7z", "tar", "gz"],
                &[
                    "application/zip",
                    "application/x-rar-compressed",
                    "application/x-7z-compressed",
                    "application/x-tar",
                    "application/gzip",
                ],
                100 * MB,
            ),
        }
    }
}

/// Encoding and resize settings for the image derivative pipeline.
#[derive(Clone, Copy, Debug)]
pub struct ImageOptions {
    /// JPEG/WebP quality for full-size variants (0-100).
    pub quality: u8,
    /// Quality for thumbnail variants.
    pub thumb_quality: u8,
    pub max_width: u32,
    pub max_height: u32,
    pub thumb_width: u32,
    pub thumb_height: u32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            quality: 85,
            thumb_quality: 80,
            max_width: 1920,
            max_height: 1080,
            thumb_width: 400,
            thumb_height: 300,
        }
    }
}

/// Pipeline configuration.
#[derive(Clone, Debug)]
pub struct MediaConfig {
    /// Filesystem root under which all assets are stored.
    pub upload_root: PathBuf,
    /// Public URL prefix corresponding to `upload_root`, e.g. `/uploads`.
    pub public_prefix: String,
    pub image: ImageOptions,
    pub policies: PolicyTable,
}

impl MediaConfig {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let upload_root = env::var("COURSEMEDIA_UPLOAD_ROOT")
            .unwrap_or_else(|_| DEFAULT_UPLOAD_ROOT.to_string());

        let public_prefix = env::var("COURSEMEDIA_PUBLIC_PREFIX")
            .unwrap_or_else(|_| DEFAULT_PUBLIC_PREFIX.to_string());
        if !public_prefix.starts_with('/') {
            anyhow::bail!(
                "COURSEMEDIA_PUBLIC_PREFIX must start with '/': {}",
                public_prefix
            );
        }

        let mut image = ImageOptions::default();
        if let Some(q) = env_parse::<u8>("COURSEMEDIA_IMAGE_QUALITY")? {
            if !(1..=100).contains(&q) {
                anyhow::bail!("COURSEMEDIA_IMAGE_QUALITY must be 1-100, got {}", q);
            }
            image.quality = q;
        }
        if let Some(q) = env_parse::<u8>("COURSEMEDIA_THUMB_QUALITY")? {
            if !(1..=100).contains(&q) {
                anyhow::bail!("COURSEMEDIA_THUMB_QUALITY must be 1-100, got {}", q);
            }
            image.thumb_quality = q;
        }

        Ok(Self {
            upload_root: PathBuf::from(upload_root),
            public_prefix,
            image,
            policies: PolicyTable::default(),
        })
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            upload_root: PathBuf::from(DEFAULT_UPLOAD_ROOT),
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
            image: ImageOptions::default(),
            policies: PolicyTable::default(),
        }
    }
}

/// Read and parse an env var. Unset is `None`; set but unparseable is an
/// error, not a silent fallback to the default.
fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>, anyhow::Error> {
    match env::var(key) {
        Ok(value) => match value.parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => anyhow::bail!("{} must be a number, got {:?}", key, value),
        },
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let table = PolicyTable::default();
        assert_eq!(table.image().max_mb(), 10);
        assert_eq!(table.for_class(FileClass::Video).max_mb(), 500);
        assert_eq!(table.for_class(FileClass::Pdf).max_mb(), 50);
        assert_eq!(table.for_class(FileClass::Document).max_mb(), 20);
        assert_eq!(table.for_class(FileClass::Audio).max_mb(), 100);
        assert_eq!(table.for_class(FileClass::Other).max_mb(), 100);
    }

    #[test]
    fn test_policy_override() {
        let table = PolicyTable::default()
            .with_image_policy(CategoryPolicy::new(&["png"], &["image/png"], MB));
        assert_eq!(table.image().max_mb(), 1);
        assert_eq!(table.image().allowed_extensions, vec!["png".to_string()]);
    }

    #[test]
    fn test_from_env_rejects_bad_quality_values() {
        // One test owns this env var so parallel tests never race on it.
        env::set_var("COURSEMEDIA_IMAGE_QUALITY", "abc");
        let unparseable = MediaConfig::from_env();
        env::set_var("COURSEMEDIA_IMAGE_QUALITY", "200");
        let out_of_range = MediaConfig::from_env();
        env::set_var("COURSEMEDIA_IMAGE_QUALITY", "70");
        let valid = MediaConfig::from_env();
        env::remove_var("COURSEMEDIA_IMAGE_QUALITY");

        assert!(unparseable.is_err());
        assert!(out_of_range.is_err());
        assert_eq!(valid.unwrap().image.quality, 70);
    }

    #[test]
    fn test_default_config() {
        let config = MediaConfig::default();
        assert_eq!(config.public_prefix, "/uploads");
        assert_eq!(config.image.quality, 85);
        assert_eq!(config.image.max_width, 1920);
        assert_eq!(config.image.thumb_height, 300);
    }
}
