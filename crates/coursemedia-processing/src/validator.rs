//! Upload validation and file classification.
//!
//! Validation runs before any encode or write work begins. Policies are
//! injected at construction so tests and per-environment deployments can
//! substitute their own limits.

use coursemedia_core::{AssetCategory, FileClass, ImageCategory, PolicyTable, UploadFile};

/// Validation rejections. Messages are surfaced to callers verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("No file uploaded")]
    NoFile,

    #[error("Invalid file type: {content_type} (allowed: {})", allowed.join(", "))]
    UnsupportedType {
        content_type: String,
        extension: String,
        allowed: Vec<String>,
    },

    #[error("File size too large. Maximum size is {max_mb}MB")]
    TooLarge { size: u64, max_mb: u64 },
}

/// What the validator resolved the upload to. Downstream steps use this
/// instead of re-deriving category or class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Image(ImageCategory),
    File(FileClass),
}

/// Policy-driven validator for both pipelines.
pub struct AssetValidator {
    policies: PolicyTable,
}

impl AssetValidator {
    pub fn new(policies: PolicyTable) -> Self {
        Self { policies }
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    /// Validate an upload against its declared category.
    ///
    /// Rejects `NoFile` for empty buffers, `UnsupportedType` when neither the
    /// declared MIME type nor the extension is acceptable for the category, and
    /// `TooLarge` when the size exceeds the resolved policy's maximum.
    pub fn validate(
        &self,
        file: &UploadFile,
        category: AssetCategory,
    ) -> Result<Resolution, ValidationError> {
        if file.is_empty() {
            return Err(ValidationError::NoFile);
        }

        let extension = file.extension();
        let content_type = file.content_type.to_lowercase();

        if let Some(image_category) = category.image_category() {
            let policy = self.policies.image();
            if !policy.allowed_content_types.contains(&content_type)
                && !policy.allowed_extensions.contains(&extension)
            {
                return Err(ValidationError::UnsupportedType {
                    content_type: file.content_type.clone(),
                    extension,
                    allowed: policy.allowed_content_types.clone(),
                });
            }
            self.check_size(file.data.len() as u64, policy.max_bytes, policy.max_mb())?;
            return Ok(Resolution::Image(image_category));
        }

        let class = self.classify(&extension, &content_type);
        if !category.allowed_classes().contains(&class) {
            let mut allowed = Vec::new();
            for c in category.allowed_classes() {
                allowed.extend(self.policies.for_class(*c).allowed_content_types.clone());
            }
            return Err(ValidationError::UnsupportedType {
                content_type: file.content_type.clone(),
                extension,
                allowed,
            });
        }

        let policy = self.policies.for_class(class);
        self.check_size(file.data.len() as u64, policy.max_bytes, policy.max_mb())?;
        Ok(Resolution::File(class))
    }

    /// Classify a course-content file from its extension and declared MIME
    /// type. Total and deterministic: extension match wins, MIME is the
    /// fallback, and anything else is [`FileClass::Other`].
    pub fn classify(&self, extension: &str, content_type: &str) -> FileClass {
        for class in FileClass::ALL {
            if self
                .policies
                .for_class(class)
                .allowed_extensions
                .iter()
                .any(|e| e == extension)
            {
                return class;
            }
        }
        for class in FileClass::ALL {
            if self
                .policies
                .for_class(class)
                .allowed_content_types
                .iter()
                .any(|ct| ct == content_type)
            {
                return class;
            }
        }
        FileClass::Other
    }

    fn check_size(&self, size: u64, max_bytes: u64, max_mb: u64) -> Result<(), ValidationError> {
        if size > max_bytes {
            return Err(ValidationError::TooLarge { size, max_mb });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursemedia_core::config::CategoryPolicy;

    fn validator() -> AssetValidator {
        AssetValidator::new(PolicyTable::default())
    }

    fn file(name: &str, content_type: &str, size: usize) -> UploadFile {
        UploadFile::new(vec![0u8; size], name, content_type)
    }

    #[test]
    fn test_empty_file_rejected() {
        let result = validator().validate(
            &UploadFile::new(vec![], "a.jpg", "image/jpeg"),
            AssetCategory::ImageBlog,
        );
        assert!(matches!(result, Err(ValidationError::NoFile)));
    }

    #[test]
    fn test_image_accepted() {
        let result = validator().validate(&file("a.jpg", "image/jpeg", 1024), AssetCategory::ImageBlog);
        assert_eq!(result.unwrap(), Resolution::Image(ImageCategory::Blog));
    }

    #[test]
    fn test_image_accepted_by_extension_alone() {
        // Unknown content type but allowed extension still passes.
        let result = validator().validate(
            &file("a.png", "application/octet-stream", 1024),
            AssetCategory::ImageAvatar,
        );
        assert_eq!(result.unwrap(), Resolution::Image(ImageCategory::Avatars));
    }

    #[test]
    fn test_image_wrong_type_rejected() {
        let result =
            validator().validate(&file("a.txt", "text/plain", 1024), AssetCategory::ImageBlog);
        assert!(matches!(
            result,
            Err(ValidationError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_image_too_large_states_limit_in_mb() {
        let table = PolicyTable::default().with_image_policy(CategoryPolicy::new(
            &["jpg"],
            &["image/jpeg"],
            2 * 1024 * 1024,
        ));
        let validator = AssetValidator::new(table);
        let err = validator
            .validate(
                &file("a.jpg", "image/jpeg", 3 * 1024 * 1024),
                AssetCategory::ImageBlog,
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "File size too large. Maximum size is 2MB"
        );
    }

    #[test]
    fn test_classify_extension_wins_over_mime() {
        let v = validator();
        // Extension says PDF even though the declared MIME is video.
        assert_eq!(v.classify("pdf", "video/mp4"), FileClass::Pdf);
    }

    #[test]
    fn test_classify_falls_back_to_mime() {
        let v = validator();
        assert_eq!(v.classify("bin", "audio/mpeg"), FileClass::Audio);
    }

    #[test]
    fn test_classify_defaults_to_other() {
        let v = validator();
        assert_eq!(
            v.classify("xyz", "application/x-unknown"),
            FileClass::Other
        );
        assert_eq!(v.classify("", ""), FileClass::Other);
    }

    #[test]
    fn test_classify_is_total_over_known_tables() {
        let v = validator();
        assert_eq!(v.classify("mp4", "video/mp4"), FileClass::Video);
        assert_eq!(v.classify("docx", ""), FileClass::Document);
        assert_eq!(v.classify("svg", "image/svg+xml"), FileClass::Image);
        assert_eq!(v.classify("zip", "application/zip"), FileClass::Other);
    }

    #[test]
    fn test_zip_accepted_as_archive() {
        let result = validator().validate(
            &file("bundle.zip", "application/zip", 1024),
            AssetCategory::CourseArchive,
        );
        assert_eq!(result.unwrap(), Resolution::File(FileClass::Other));
    }

    #[test]
    fn test_video_rejected_for_document_category() {
        let result = validator().validate(
            &file("lecture.mp4", "video/mp4", 1024),
            AssetCategory::CourseDocument,
        );
        assert!(matches!(
            result,
            Err(ValidationError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_document_size_limit() {
        let err = validator()
            .validate(
                &file("notes.docx", "text/plain", 21 * 1024 * 1024),
                AssetCategory::CourseDocument,
            )
            .unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { max_mb: 20, .. }));
    }

    #[test]
    fn test_pdf_gets_larger_limit_than_documents() {
        // 30MB PDF is fine; the PDF class allows up to 50MB.
        let result = validator().validate(
            &file("book.pdf", "application/pdf", 30 * 1024 * 1024),
            AssetCategory::CourseDocument,
        );
        assert_eq!(result.unwrap(), Resolution::File(FileClass::Pdf));
    }
}
