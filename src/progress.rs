//! Progress-callback trait for per-file directory-scan events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::AnalysisConfigBuilder::progress_callback`] to receive
//! events as [`crate::analyze_directory`] works through a directory.
//!
//! Files are analysed concurrently on the blocking pool, but events are
//! delivered in input order: an image's `on_image_complete` fires only once
//! every earlier image has been reported.
//!
//! # Example
//!
//! ```rust
//! use image_relevance::{AnalysisConfig, BatchEntry, BatchProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     failed: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_image_complete(&self, _index: usize, _total: usize, entry: &BatchEntry) {
//!         if entry.error().is_some() {
//!             self.failed.fetch_add(1, Ordering::SeqCst);
//!         }
//!     }
//! }
//!
//! let config = AnalysisConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { failed: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::BatchEntry;
use std::sync::Arc;

/// Called by the directory scan as it processes each file.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after the scan has listed the candidate files.
    fn on_batch_start(&self, total_images: usize) {
        let _ = total_images;
    }

    /// Called once per file, analysed or failed.
    ///
    /// # Arguments
    /// * `index` — 0-based position of the file in the sorted scan
    /// * `total` — number of candidate files
    /// * `entry` — the per-file result as it will appear in the report
    fn on_image_complete(&self, index: usize, total: usize, entry: &BatchEntry) {
        let _ = (index, total, entry);
    }

    /// Called once after every file has been attempted.
    ///
    /// # Arguments
    /// * `total`          — number of candidate files
    /// * `should_process` — files recommended for VLM processing
    fn on_batch_complete(&self, total: usize, should_process: usize) {
        let _ = (total, should_process);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::AnalysisConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
