//! Unique, filesystem-safe asset names.

use std::path::Path;
use uuid::Uuid;

/// Generates collision-resistant stored filenames.
///
/// `{prefix}{sanitized_stem}_{token}{.ext}` where the token is 8 hex chars of a
/// fresh UUIDv4. The token, not a timestamp, provides uniqueness: two uploads of
/// the same filename in the same millisecond still diverge.
pub struct NameGenerator;

impl NameGenerator {
    /// Derive a unique stored filename from the original name.
    ///
    /// The prefix is caller-supplied namespacing context (e.g.
    /// `course_{id}_lesson_{id}_` or `blog_`) and is prepended verbatim.
    pub fn generate(original_filename: &str, prefix: &str) -> String {
        let path = Path::new(original_filename);
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("file");
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        let sanitized: String = stem
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let token = Self::token();

        match extension {
            Some(ext) => format!("{}{}_{}.{}", prefix, sanitized, token, ext),
            None => format!("{}{}_{}", prefix, sanitized, token),
        }
    }

    /// 8 hex characters from a fresh UUIDv4.
    fn token() -> String {
        Uuid::new_v4().simple().to_string()[..8].to_string()
    }
}
