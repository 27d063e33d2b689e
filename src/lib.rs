//! # image-relevance
//!
//! Decide which images extracted from documents are worth an expensive
//! Vision Language Model (VLM) call, and resize them for their consumers.
//!
//! ## Why this crate?
//!
//! PDFs are full of images that carry no content: logos in every header,
//! bullet icons, horizontal rules, decorative banners. Sending each one to
//! a VLM costs tokens and latency for nothing. This crate scores every
//! image with a deterministic, multi-layer heuristic over its dimensions
//! and colour statistics. It never runs a model, OCR, or any semantic
//! recognition.
//!
//! ## Pipeline Overview
//!
//! ```text
//! image
//!  │
//!  ├─ 1. Colours   nearest-neighbour sample → distinct colours → diversity
//!  ├─ 2. Geometry  size score (stepped area) + aspect score
//!  ├─ 3. Classify  ordered rules → photo / chart / document / logo / icon / …
//!  ├─ 4. Score     weighted relevance + skip cascade → verdict
//!  └─ 5. Resize    (separately) OCR width cap or VLM dimension cap, Lanczos3
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use image_relevance::{analyze_image, resize_for_vlm, AnalysisConfig, VlmProfile};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalysisConfig::default();
//!     let analysis = analyze_image("figure-3.png", &config)?;
//!     if analysis.verdict.should_process() {
//!         let out = resize_for_vlm("figure-3.png", "/tmp/figure-3.png", &VlmProfile::default())?;
//!         eprintln!("resized: {}", out.resized);
//!     } else {
//!         eprintln!("skip: {}", analysis.verdict.skip_reason.unwrap());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `imgrel` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! image-relevance = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod raster;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{
    analyze_directory, analyze_directory_sync, analyze_files, analyze_image, analyze_raster,
    resize_for_ocr, resize_for_vlm, resize_image,
};
pub use config::{
    AnalysisConfig, AnalysisConfigBuilder, CategoryBonus, OcrProfile, ResizeProfile, ScoreWeights,
    SizeSteps, VlmProfile,
};
pub use error::{EntryError, RelevanceError};
pub use output::{
    AnalysisReport, BatchEntry, BatchReport, BatchSummary, Bucket, Category, ColorSample,
    GeometryScore, ImageAnalysis, RelevanceVerdict, ResizeOutcome, SkipReason,
};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use raster::RasterImage;
