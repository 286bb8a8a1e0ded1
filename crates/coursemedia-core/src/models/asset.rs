//! Asset domain models: upload input, categories, classes, and result descriptors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Raw upload input as extracted from a multipart request by the caller.
///
/// This is the only shape the pipeline reads: bytes, the original filename, and
/// the declared content type. Declared size is `data.len()`.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub data: Vec<u8>,
    pub original_filename: String,
    pub content_type: String,
}

impl UploadFile {
    pub fn new(
        data: Vec<u8>,
        original_filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            data,
            original_filename: original_filename.into(),
            content_type: content_type.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Lowercased extension of the original filename, without the leading dot.
    /// Empty string if the filename has no extension.
    pub fn extension(&self) -> String {
        Path::new(&self.original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default()
    }
}

/// Closed set of upload categories accepted by the pipeline.
///
/// `Image*` categories go through the image derivative pipeline; `Course*`
/// categories go through the generic course-content pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetCategory {
    ImageBlog,
    ImageAvatar,
    ImageThumbnail,
    CourseVideo,
    CourseDocument,
    CourseImage,
    CourseAudio,
    CourseArchive,
}

impl AssetCategory {
    /// The image sub-category, if this is an image-pipeline category.
    pub fn image_category(self) -> Option<ImageCategory> {
        match self {
            AssetCategory::ImageBlog => Some(ImageCategory::Blog),
            AssetCategory::ImageAvatar => Some(ImageCategory::Avatars),
            AssetCategory::ImageThumbnail => Some(ImageCategory::Thumbnails),
            _ => None,
        }
    }

    /// File classes a course-content category accepts. Empty for image categories.
    pub fn allowed_classes(self) -> &'static [FileClass] {
        match self {
            AssetCategory::CourseVideo => &[FileClass::Video],
            AssetCategory::CourseDocument => &[FileClass::Pdf, FileClass::Document],
            AssetCategory::CourseImage => &[FileClass::Image],
            AssetCategory::CourseAudio => &[FileClass::Audio],
            AssetCategory::CourseArchive => &[FileClass::Other],
            _ => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssetCategory::ImageBlog => "image-blog",
            AssetCategory::ImageAvatar => "image-avatar",
            AssetCategory::ImageThumbnail => "image-thumbnail",
            AssetCategory::CourseVideo => "course-video",
            AssetCategory::CourseDocument => "course-document",
            AssetCategory::CourseImage => "course-image",
            AssetCategory::CourseAudio => "course-audio",
            AssetCategory::CourseArchive => "course-archive",
        }
    }
}

/// Destination sub-directory for processed images.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageCategory {
    Blog,
    Avatars,
    Thumbnails,
}

impl ImageCategory {
    /// Storage sub-directory under the upload root. The reclaimer depends on
    /// this mapping staying stable.
    pub fn subdir(self) -> &'static str {
        match self {
            ImageCategory::Blog => "blog",
            ImageCategory::Avatars => "avatars",
            ImageCategory::Thumbnails => "thumbnails",
        }
    }
}

/// Classification of a course-content file.
///
/// Every input maps to exactly one class; unknown types fall back to [`FileClass::Other`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileClass {
    Video,
    Pdf,
    Document,
    Image,
    Audio,
    Other,
}

impl FileClass {
    /// All classes in classification precedence order.
    pub const ALL: [FileClass; 6] = [
        FileClass::Video,
        FileClass::Pdf,
        FileClass::Document,
        FileClass::Image,
        FileClass::Audio,
        FileClass::Other,
    ];

    /// Storage sub-directory under `course-content/`.
    pub fn subdir(self) -> &'static str {
        match self {
            FileClass::Video => "videos",
            FileClass::Pdf | FileClass::Document => "documents",
            FileClass::Image => "images",
            FileClass::Audio => "audio",
            FileClass::Other => "archives",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileClass::Video => "VIDEO",
            FileClass::Pdf => "PDF",
            FileClass::Document => "DOCUMENT",
            FileClass::Image => "IMAGE",
            FileClass::Audio => "AUDIO",
            FileClass::Other => "OTHER",
        }
    }
}

/// Result of a successful image upload. All four URLs point to files that were
/// written before this descriptor was returned.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageAssetDescriptor {
    pub original: String,
    pub thumbnail: String,
    pub webp: String,
    pub webp_thumbnail: String,
    pub filename: String,
    /// Byte size of the primary (JPEG full-size) variant.
    pub size: usize,
    pub width: u32,
    pub height: u32,
    pub uploaded_at: DateTime<Utc>,
}

/// Result of a successful course-content upload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileAssetDescriptor {
    pub url: String,
    pub filename: String,
    pub size: usize,
    pub class: FileClass,
    pub original_name: String,
    pub uploaded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_lowercased() {
        let file = UploadFile::new(vec![1], "Photo.JPG", "image/jpeg");
        assert_eq!(file.extension(), "jpg");
    }

    #[test]
    fn test_extension_missing() {
        let file = UploadFile::new(vec![1], "noextension", "application/octet-stream");
        assert_eq!(file.extension(), "");
    }

    #[test]
    fn test_image_category_mapping() {
        assert_eq!(
            AssetCategory::ImageAvatar.image_category(),
            Some(ImageCategory::Avatars)
        );
        assert_eq!(AssetCategory::CourseVideo.image_category(), None);
    }

    #[test]
    fn test_course_categories_have_classes() {
        assert_eq!(
            AssetCategory::CourseDocument.allowed_classes(),
            &[FileClass::Pdf, FileClass::Document]
        );
        assert!(AssetCategory::ImageBlog.allowed_classes().is_empty());
    }

    #[test]
    fn test_class_subdirs() {
        assert_eq!(FileClass::Video.subdir(), "videos");
        assert_eq!(FileClass::Pdf.subdir(), "documents");
        assert_eq!(FileClass::Document.subdir(), "documents");
        assert_eq!(FileClass::Other.subdir(), "archives");
    }
}
