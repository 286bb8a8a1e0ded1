//! URL helpers built on the derivative naming convention.
//!
//! These recompute variant URLs from a stored path instead of looking anything
//! up, so they work on URLs persisted long before this process started.

/// Where a stored course-content URL points inside the upload root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileLocation {
    /// Class subdirectory, e.g. `videos` or `documents`.
    pub class_dir: String,
    pub filename: String,
    /// Path relative to the upload root, suitable for
    /// [`AssetStore::remove`](coursemedia_storage::AssetStore::remove).
    pub relative_path: String,
}

/// Rewrite an image URL to its WebP variant. URLs already ending in `.webp`
/// pass through, as does anything without an extension.
pub fn optimized_url(image_path: &str, prefer_webp: bool) -> String {
    if image_path.is_empty() {
        return String::new();
    }
    if !prefer_webp {
        return image_path.to_string();
    }
    match split_extension(image_path) {
        Some((_, "webp")) => image_path.to_string(),
        Some((base, _)) => format!("{}.webp", base),
        None => image_path.to_string(),
    }
}

/// Rewrite an image URL to its thumbnail variant, in WebP or JPEG form.
pub fn thumbnail_url(image_path: &str, prefer_webp: bool) -> String {
    if image_path.is_empty() {
        return String::new();
    }
    let base = split_extension(image_path)
        .map(|(base, _)| base)
        .unwrap_or(image_path);
    if prefer_webp {
        format!("{}_thumb.webp", base)
    } else {
        format!("{}_thumb.jpg", base)
    }
}

/// Parse a course-content URL back into its storage location. The last two
/// segments are the class subdirectory and the filename; anything shorter is
/// not a stored course-content URL.
pub fn file_info(file_url: &str) -> Option<FileLocation> {
    let mut segments = file_url.rsplit('/');
    let filename = segments.next().filter(|s| !s.is_empty())?;
    let class_dir = segments.next().filter(|s| !s.is_empty())?;
    Some(FileLocation {
        class_dir: class_dir.to_string(),
        filename: filename.to_string(),
        relative_path: format!("course-content/{}/{}", class_dir, filename),
    })
}

/// Split off the extension after the final dot of the final path segment.
/// Dots in directory names are not extensions.
fn split_extension(path: &str) -> Option<(&str, &str)> {
    let dot = path.rfind('.')?;
    if path[dot..].contains('/') {
        return None;
    }
    Some((&path[..dot], &path[dot + 1..]))
}
