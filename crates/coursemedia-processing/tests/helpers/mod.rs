//! Test helpers: build an UploadPipeline over a tempdir-backed LocalStore.
//!
//! Run with: `cargo test -p coursemedia-processing`.

pub mod fixtures;

use coursemedia_core::MediaConfig;
use coursemedia_processing::UploadPipeline;
use coursemedia_storage::LocalStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Once;
use tempfile::TempDir;

/// Pipeline plus the resources it writes into. Dropping the `TempDir` cleans
/// up everything the tests wrote.
pub struct TestPipeline {
    pub pipeline: UploadPipeline,
    pub store: Arc<LocalStore>,
    pub root: TempDir,
}

impl TestPipeline {
    /// Filesystem path behind a public URL returned by the pipeline.
    pub fn fs_path(&self, url: &str) -> PathBuf {
        let rest = url
            .strip_prefix("/uploads/")
            .unwrap_or_else(|| panic!("unexpected url shape: {}", url));
        self.root.path().join(rest)
    }
}

pub fn setup_pipeline() -> TestPipeline {
    init_tracing();
    let root = tempfile::tempdir().expect("create tempdir");
    let config = MediaConfig {
        upload_root: root.path().to_path_buf(),
        ..MediaConfig::default()
    };
    let store = Arc::new(LocalStore::from_config(&config));
    let pipeline = UploadPipeline::new(store.clone(), &config);
    TestPipeline {
        pipeline,
        store,
        root,
    }
}

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("info")
            .with_test_writer()
            .try_init();
    });
}
