//! Derivative reclaimer.
//!
//! Deletion is keyed purely by path convention: an image asset's four variants
//! share one stem (`{stem}`, `{stem}_thumb`) crossed with two encodings
//! (`.jpg`, `.webp`). The candidate set is recomputed here from the base path
//! alone; there is no persisted manifest. Creation (the derivative renderer)
//! and deletion must therefore agree on this module's convention.

use crate::traits::{AssetStore, StorageError};
use std::sync::Arc;

/// Variant suffixes in the order they are attempted.
const VARIANT_SUFFIXES: [&str; 4] = [".jpg", "_thumb.jpg", ".webp", "_thumb.webp"];

/// Outcome of a reclaim pass. Reclaiming never fails as a whole: missing files
/// already satisfy the goal, and other per-file failures are collected here for
/// reporting instead of aborting the remaining candidates.
#[derive(Debug, Default)]
pub struct ReclaimReport {
    pub removed: Vec<String>,
    pub missing: Vec<String>,
    pub failures: Vec<(String, StorageError)>,
}

impl ReclaimReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Deletes all derivative files of an asset.
pub struct AssetReclaimer {
    store: Arc<dyn AssetStore>,
}

impl AssetReclaimer {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self { store }
    }

    /// Compute the full candidate set of derivative paths for a base path.
    ///
    /// The base path may carry an extension (`/uploads/blog/foo_ab12cd34.jpg`)
    /// or not (`/uploads/blog/foo_ab12cd34`); either way the stem is crossed
    /// with the thumb suffix and both encodings.
    pub fn variant_candidates(base_relative_path: &str) -> Vec<String> {
        let stem = strip_extension(base_relative_path);
        VARIANT_SUFFIXES
            .iter()
            .map(|suffix| format!("{}{}", stem, suffix))
            .collect()
    }

    /// Delete every derivative of an image asset. Idempotent: files that never
    /// existed or were already removed count as success.
    pub async fn delete_all_variants(&self, base_relative_path: &str) -> ReclaimReport {
        let mut report = ReclaimReport::default();

        for candidate in Self::variant_candidates(base_relative_path) {
            self.remove_candidate(candidate, &mut report).await;
        }

        if !report.failures.is_empty() {
            tracing::warn!(
                base = %base_relative_path,
                removed = report.removed.len(),
                failed = report.failures.len(),
                "Reclaim completed with failures"
            );
        } else {
            tracing::info!(
                base = %base_relative_path,
                removed = report.removed.len(),
                missing = report.missing.len(),
                "Reclaim completed"
            );
        }
        report
    }

    /// Delete a single stored file (generic course-content assets have exactly
    /// one variant). Missing files are not an error.
    pub async fn delete_file(&self, relative_path: &str) -> ReclaimReport {
        let mut report = ReclaimReport::default();
        self.remove_candidate(relative_path.to_string(), &mut report)
            .await;
        report
    }

    async fn remove_candidate(&self, candidate: String, report: &mut ReclaimReport) {
        match self.store.remove(&candidate).await {
            Ok(true) => report.removed.push(candidate),
            Ok(false) => report.missing.push(candidate),
            Err(e) => {
                tracing::warn!(path = %candidate, error = %e, "Failed to remove derivative");
                report.failures.push((candidate, e));
            }
        }
    }
}

fn strip_extension(path: &str) -> &str {
    match (path.rfind('.'), path.rfind('/')) {
        (Some(dot), Some(slash)) if dot > slash => &path[..dot],
        (Some(dot), None) => &path[..dot],
        _ => path,
    }
}
