//! Entry points: analyse one image, resize one image, or scan a directory.
//!
//! Per-image work is synchronous and pure over the decoded buffer; nothing
//! is cached between calls, so analysing the same file twice decodes it
//! twice and yields bit-identical results.
//!
//! ## Directory scans
//!
//! [`analyze_directory`] fans files out to Tokio's blocking pool, at most
//! `config.concurrency` at a time. Results are collected with *ordered*
//! buffering, so the report lists files in sorted path order no matter
//! which finishes first. A file that fails to decode becomes a
//! [`BatchEntry::Failed`]; the scan itself only fails when the directory
//! cannot be listed.

use crate::config::{AnalysisConfig, OcrProfile, ResizeProfile, VlmProfile};
use crate::error::{EntryError, RelevanceError};
use crate::output::{BatchEntry, BatchReport, BatchSummary, ImageAnalysis, ResizeOutcome};
use crate::pipeline::{classify, colors, encode, geometry, input, resize, score};
use crate::raster::RasterImage;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Analyse an already-decoded image.
///
/// Colour sampling and geometry scoring are independent; classification
/// consumes both, and the scorer consumes all three.
pub fn analyze_raster(image: &impl RasterImage, config: &AnalysisConfig) -> ImageAnalysis {
    let (width, height) = image.size();

    let colors = colors::color_diversity(image, config.sample_size);
    let geometry = geometry::score_geometry(width, height, &config.size_steps);

    let features = classify::Features::new(width, height, &colors);
    let category = classify::classify(&features);

    let verdict = score::score((width, height), &colors, &geometry, category, config);
    debug!(
        "{}x{}: {} colours, category {}, relevance {:.3}",
        width, height, colors.unique_colors, category, verdict.overall_relevance
    );

    ImageAnalysis {
        width,
        height,
        aspect_ratio: features.aspect_ratio(),
        colors,
        geometry,
        verdict,
    }
}

/// Decode and analyse the image at `path`.
pub fn analyze_image(
    path: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<ImageAnalysis, RelevanceError> {
    let path = path.as_ref();
    let image = input::decode_image(path)?;
    let analysis = analyze_raster(&image, config);
    info!(
        "Analysed {}: {} (relevance {:.3})",
        path.display(),
        if analysis.verdict.should_process() {
            "process"
        } else {
            "skip"
        },
        analysis.verdict.overall_relevance
    );
    Ok(analysis)
}

/// Downscale an image to the OCR width ceiling and write it to `output`.
pub fn resize_for_ocr(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    profile: &OcrProfile,
) -> Result<ResizeOutcome, RelevanceError> {
    resize_image(
        input_path.as_ref(),
        output_path.as_ref(),
        &ResizeProfile::Ocr(*profile),
    )
}

/// Downscale an image to the VLM dimension cap and write it to `output`.
///
/// Images below `profile.skip_below` are reported as skipped and no file
/// is written.
pub fn resize_for_vlm(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    profile: &VlmProfile,
) -> Result<ResizeOutcome, RelevanceError> {
    resize_image(
        input_path.as_ref(),
        output_path.as_ref(),
        &ResizeProfile::Vlm(*profile),
    )
}

/// Resize `input_path` under `profile` and write the result to `output_path`.
pub fn resize_image(
    input_path: &Path,
    output_path: &Path,
    profile: &ResizeProfile,
) -> Result<ResizeOutcome, RelevanceError> {
    let image = input::decode_image(input_path)?;
    let (width, height) = (image.width(), image.height());
    let plan = resize::plan(width, height, profile);
    info!("Resize {} ({}x{}): {}", input_path.display(), width, height, plan);

    // A skip writes nothing, so only a plan with output cares about the extension.
    if !matches!(plan, resize::ResizePlan::Skip { .. }) {
        encode::output_format(output_path)?;
    }

    match plan {
        resize::ResizePlan::Skip { .. } => Ok(ResizeOutcome::skipped(width, height, plan.to_string())),
        resize::ResizePlan::Keep => {
            if !same_file(input_path, output_path) {
                encode::write_image(&image, output_path)?;
            }
            Ok(ResizeOutcome::unchanged(width, height, output_path))
        }
        resize::ResizePlan::Downscale {
            width: out_w,
            height: out_h,
            scale,
        } => {
            let resized = resize::apply(&image, out_w, out_h);
            encode::write_image(&resized, output_path)?;
            Ok(ResizeOutcome::downscaled(
                (width, height),
                (out_w, out_h),
                scale,
                output_path,
            ))
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Analyse every recognised image directly inside `dir`.
///
/// # Errors
/// Only fails when `dir` is missing, is not a directory, or cannot be
/// listed. Per-file failures are reported inside the returned
/// [`BatchReport`].
pub async fn analyze_directory(
    dir: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<BatchReport, RelevanceError> {
    let start = Instant::now();
    let dir = dir.as_ref().to_path_buf();
    info!("Scanning directory: {}", dir.display());

    let paths = input::list_images(&dir)?;
    let total = paths.len();

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let concurrency = config.concurrency.max(1);
    let entries: Vec<BatchEntry> = stream::iter(paths.into_iter().enumerate())
        .map(|(idx, path)| {
            let task_config = config.clone();
            async move {
                let task_path = path.clone();
                let joined =
                    tokio::task::spawn_blocking(move || analyze_image(&task_path, &task_config))
                        .await;
                (idx, path, joined)
            }
        })
        .buffered(concurrency)
        .map(|(idx, path, joined)| {
            let entry = match joined {
                Ok(Ok(analysis)) => BatchEntry::analyzed(path, analysis),
                Ok(Err(e)) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    BatchEntry::failed(path, EntryError::from(e))
                }
                Err(join_err) => {
                    warn!("Analysis task for {} failed: {}", path.display(), join_err);
                    BatchEntry::failed(
                        path,
                        EntryError::TaskFailed {
                            detail: join_err.to_string(),
                        },
                    )
                }
            };
            if let Some(ref cb) = config.progress_callback {
                cb.on_image_complete(idx, total, &entry);
            }
            entry
        })
        .collect()
        .await;

    let summary = BatchSummary::tally(&entries);

    info!(
        "Scan complete: {}/{} to process, {} failed, {}ms",
        summary.should_vlm,
        summary.total,
        summary.failed,
        start.elapsed().as_millis()
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, summary.should_vlm);
    }

    Ok(BatchReport {
        directory: dir,
        summary,
        images: entries,
    })
}

/// Synchronous wrapper around [`analyze_directory`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_directory_sync(
    dir: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<BatchReport, RelevanceError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| RelevanceError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(analyze_directory(dir, config))
}

/// Analyse an explicit list of files, in the given order, synchronously.
///
/// Unlike [`analyze_directory`] nothing is filtered by extension: every
/// path is attempted and failures are recorded per entry.
pub fn analyze_files(paths: &[PathBuf], config: &AnalysisConfig) -> Vec<BatchEntry> {
    paths
        .iter()
        .map(|path| match analyze_image(path, config) {
            Ok(analysis) => BatchEntry::analyzed(path.clone(), analysis),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                BatchEntry::failed(path.clone(), e.into())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Category;
    use image::{Rgb, RgbImage};

    #[test]
    fn uniform_tiny_image_is_an_icon() {
        let img = RgbImage::from_pixel(40, 40, Rgb([9, 9, 9]));
        let a = analyze_raster(&img, &AnalysisConfig::default());
        assert_eq!(a.colors.unique_colors, 1);
        assert_eq!(a.geometry.size_score, 0.0);
        assert_eq!(a.verdict.category, Category::Icon);
        assert!(!a.verdict.should_process());
    }

    #[test]
    fn analysis_is_deterministic() {
        let img = RgbImage::from_fn(640, 480, |x, y| Rgb([(x % 97) as u8, (y % 89) as u8, 7]));
        let config = AnalysisConfig::default();
        assert_eq!(analyze_raster(&img, &config), analyze_raster(&img, &config));
    }

    #[test]
    fn skipped_resize_ignores_output_extension() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("dot.png");
        RgbImage::from_pixel(30, 30, Rgb([1, 2, 3])).save(&input).unwrap();
        let output = dir.path().join("dot.txt");

        let outcome = resize_for_vlm(&input, &output, &VlmProfile::default()).unwrap();
        assert!(outcome.skipped);
        assert!(!output.exists());

        // Anything that would be written still needs an encodable extension.
        let err = resize_for_ocr(&input, &output, &OcrProfile::default()).unwrap_err();
        assert!(matches!(err, RelevanceError::UnsupportedOutputFormat { .. }));
    }

    #[test]
    fn same_file_detects_identical_paths() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("a.png");
        std::fs::write(&p, b"x").unwrap();
        assert!(same_file(&p, &p));
        assert!(same_file(&p, &dir.path().join(".").join("a.png")));
        assert!(!same_file(&p, &dir.path().join("b.png")));
    }
}
