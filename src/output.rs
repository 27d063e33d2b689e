//! Result types produced by analysis, resizing and directory scans.
//!
//! Internal values keep full `f64` precision so that re-analysing an image
//! yields bit-identical verdicts. JSON views round the way downstream
//! consumers expect: scores to 3 decimals, aspect ratio to 2, scale factor
//! to 4.

use crate::error::EntryError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

// ── Category ─────────────────────────────────────────────────────────────

/// Predicted image category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Photographs and screenshots.
    Photo,
    /// Charts, graphs and diagrams.
    Chart,
    /// Scanned pages, forms, text blocks.
    Document,
    /// Branding marks.
    Logo,
    /// UI icons and tiny glyphs.
    Icon,
    /// Borders, rules, banners and separators.
    Decorative,
    /// Nothing matched.
    Unknown,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Photo,
        Category::Chart,
        Category::Document,
        Category::Logo,
        Category::Icon,
        Category::Decorative,
        Category::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Photo => "photo",
            Category::Chart => "chart",
            Category::Document => "document",
            Category::Logo => "logo",
            Category::Icon => "icon",
            Category::Decorative => "decorative",
            Category::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Component scores ─────────────────────────────────────────────────────

/// Distinct-colour count of the sampled pixels and its normalised score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorSample {
    /// Distinct RGB colours, capped at 65 536.
    pub unique_colors: u32,
    /// `[0, 1]`; 0 for a single colour, 1 at 256 colours or more.
    pub diversity_score: f64,
}

/// Size and aspect components derived from raw dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometryScore {
    pub size_score: f64,
    pub aspect_score: f64,
}

// ── Verdict ──────────────────────────────────────────────────────────────

/// Why an image should not be sent to the VLM.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Longest side below the configured minimum.
    TooSmall {
        width: u32,
        height: u32,
        min_dimension: u32,
    },
    /// Classified as a category that never carries analysable content.
    PredictedCategory(Category),
    /// Classified as a logo and scored below the logo floor.
    LikelyLogo { relevance: f64 },
    /// Overall relevance below the configured minimum.
    LowRelevance { relevance: f64, threshold: f64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooSmall {
                width,
                height,
                min_dimension,
            } => write!(f, "Too small: {width}x{height} < {min_dimension}px"),
            SkipReason::PredictedCategory(c) => write!(f, "Predicted category: {c}"),
            SkipReason::LikelyLogo { relevance } => {
                write!(f, "Likely logo with low relevance: {relevance:.2}")
            }
            SkipReason::LowRelevance {
                relevance,
                threshold,
            } => write!(f, "Low relevance score: {relevance:.2} < {threshold}"),
        }
    }
}

impl Serialize for SkipReason {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

/// The outcome bucket a verdict falls into, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    ShouldProcess,
    SkipTooSmall,
    SkipLogoIcon,
    SkipDecorative,
    SkipLowRelevance,
}

/// Combined relevance score, category and the process/skip decision.
///
/// `skip_reason` is the single source of truth: an image should be
/// processed exactly when there is no reason to skip it.
#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceVerdict {
    pub overall_relevance: f64,
    pub category: Category,
    pub skip_reason: Option<SkipReason>,
}

impl RelevanceVerdict {
    pub fn should_process(&self) -> bool {
        self.skip_reason.is_none()
    }

    /// The directory-scan bucket for this verdict.
    pub fn bucket(&self) -> Bucket {
        match &self.skip_reason {
            None => Bucket::ShouldProcess,
            Some(SkipReason::TooSmall { .. }) => Bucket::SkipTooSmall,
            Some(_) => match self.category {
                Category::Logo | Category::Icon => Bucket::SkipLogoIcon,
                Category::Decorative => Bucket::SkipDecorative,
                _ => Bucket::SkipLowRelevance,
            },
        }
    }
}

// ── Full analysis ────────────────────────────────────────────────────────

/// Everything computed for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnalysis {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f64,
    pub colors: ColorSample,
    pub geometry: GeometryScore,
    pub verdict: RelevanceVerdict,
}

impl ImageAnalysis {
    /// Flat, rounded JSON view.
    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            width: self.width,
            height: self.height,
            aspect_ratio: round_to(self.aspect_ratio, 2),
            unique_colors: self.colors.unique_colors,
            color_diversity_score: round_to(self.colors.diversity_score, 3),
            size_score: round_to(self.geometry.size_score, 3),
            aspect_score: round_to(self.geometry.aspect_score, 3),
            overall_relevance: round_to(self.verdict.overall_relevance, 3),
            predicted_category: self.verdict.category,
            should_vlm: self.verdict.should_process(),
            skip_reason: self.verdict.skip_reason.clone(),
        }
    }
}

/// Serialisable view of an [`ImageAnalysis`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f64,
    pub unique_colors: u32,
    pub color_diversity_score: f64,
    pub size_score: f64,
    pub aspect_score: f64,
    pub overall_relevance: f64,
    pub predicted_category: Category,
    pub should_vlm: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<SkipReason>,
}

// ── Resize ───────────────────────────────────────────────────────────────

/// Result of one resize operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResizeOutcome {
    pub resized: bool,
    pub original_width: u32,
    pub original_height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_height: Option<u32>,
    /// In `(0, 1)`; present only when the image was downscaled.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_scale"
    )]
    pub scale_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

impl ResizeOutcome {
    pub fn unchanged(width: u32, height: u32, output_path: &Path) -> Self {
        Self {
            resized: false,
            original_width: width,
            original_height: height,
            output_width: Some(width),
            output_height: Some(height),
            scale_factor: None,
            output_path: Some(output_path.to_path_buf()),
            skipped: false,
            skip_reason: None,
        }
    }

    pub fn downscaled(
        (width, height): (u32, u32),
        (output_width, output_height): (u32, u32),
        scale: f64,
        output_path: &Path,
    ) -> Self {
        Self {
            resized: true,
            original_width: width,
            original_height: height,
            output_width: Some(output_width),
            output_height: Some(output_height),
            scale_factor: Some(scale),
            output_path: Some(output_path.to_path_buf()),
            skipped: false,
            skip_reason: None,
        }
    }

    pub fn skipped(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self {
            resized: false,
            original_width: width,
            original_height: height,
            output_width: None,
            output_height: None,
            scale_factor: None,
            output_path: None,
            skipped: true,
            skip_reason: Some(reason.into()),
        }
    }
}

fn serialize_scale<S: Serializer>(v: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(scale) => s.serialize_f64(round_to(*scale, 4)),
        None => s.serialize_none(),
    }
}

// ── Directory scan ───────────────────────────────────────────────────────

/// One file of a directory scan.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEntry {
    Analyzed { path: PathBuf, analysis: ImageAnalysis },
    Failed { path: PathBuf, error: EntryError },
}

impl BatchEntry {
    pub fn analyzed(path: PathBuf, analysis: ImageAnalysis) -> Self {
        BatchEntry::Analyzed { path, analysis }
    }

    pub fn failed(path: PathBuf, error: EntryError) -> Self {
        BatchEntry::Failed { path, error }
    }

    pub fn path(&self) -> &Path {
        match self {
            BatchEntry::Analyzed { path, .. } | BatchEntry::Failed { path, .. } => path,
        }
    }

    pub fn analysis(&self) -> Option<&ImageAnalysis> {
        match self {
            BatchEntry::Analyzed { analysis, .. } => Some(analysis),
            BatchEntry::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&EntryError> {
        match self {
            BatchEntry::Failed { error, .. } => Some(error),
            BatchEntry::Analyzed { .. } => None,
        }
    }

    /// Failed entries are never processed.
    pub fn should_process(&self) -> bool {
        self.analysis()
            .is_some_and(|a| a.verdict.should_process())
    }
}

#[derive(Serialize)]
struct EntryView<'a> {
    path: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    relevance: Option<f64>,
    should_vlm: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    skip_reason: Option<&'a SkipReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Serialize for BatchEntry {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let view = match self {
            BatchEntry::Analyzed { path, analysis } => EntryView {
                path,
                width: Some(analysis.width),
                height: Some(analysis.height),
                category: Some(analysis.verdict.category),
                relevance: Some(round_to(analysis.verdict.overall_relevance, 3)),
                should_vlm: analysis.verdict.should_process(),
                skip_reason: analysis.verdict.skip_reason.as_ref(),
                error: None,
            },
            BatchEntry::Failed { path, error } => EntryView {
                path,
                width: None,
                height: None,
                category: None,
                relevance: None,
                should_vlm: false,
                skip_reason: None,
                error: Some(error.to_string()),
            },
        };
        view.serialize(s)
    }
}

/// Outcome counts of a directory scan.
///
/// `total` counts every candidate file, including failed ones; the five
/// buckets count only analysed files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub should_vlm: usize,
    pub skip_too_small: usize,
    pub skip_logo_icon: usize,
    pub skip_decorative: usize,
    pub skip_low_relevance: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn tally(entries: &[BatchEntry]) -> Self {
        let mut summary = Self {
            total: entries.len(),
            ..Self::default()
        };
        for entry in entries {
            match entry.analysis() {
                Some(a) => summary.record(a.verdict.bucket()),
                None => summary.failed += 1,
            }
        }
        summary
    }

    fn record(&mut self, bucket: Bucket) {
        let slot = match bucket {
            Bucket::ShouldProcess => &mut self.should_vlm,
            Bucket::SkipTooSmall => &mut self.skip_too_small,
            Bucket::SkipLogoIcon => &mut self.skip_logo_icon,
            Bucket::SkipDecorative => &mut self.skip_decorative,
            Bucket::SkipLowRelevance => &mut self.skip_low_relevance,
        };
        *slot += 1;
    }
}

/// Summary plus per-file detail of a directory scan, in scan order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub directory: PathBuf,
    #[serde(flatten)]
    pub summary: BatchSummary,
    pub images: Vec<BatchEntry>,
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(category: Category, skip_reason: Option<SkipReason>) -> RelevanceVerdict {
        RelevanceVerdict {
            overall_relevance: 0.25,
            category,
            skip_reason,
        }
    }

    #[test]
    fn category_serialises_lowercase() {
        let json = serde_json::to_string(&Category::Decorative).unwrap();
        assert_eq!(json, "\"decorative\"");
        assert_eq!(Category::Photo.to_string(), "photo");
    }

    #[test]
    fn skip_reason_text() {
        let r = SkipReason::TooSmall {
            width: 30,
            height: 20,
            min_dimension: 50,
        };
        assert_eq!(r.to_string(), "Too small: 30x20 < 50px");
        assert_eq!(
            SkipReason::PredictedCategory(Category::Icon).to_string(),
            "Predicted category: icon"
        );
        assert_eq!(
            SkipReason::LowRelevance {
                relevance: 0.2456,
                threshold: 0.3
            }
            .to_string(),
            "Low relevance score: 0.25 < 0.3"
        );
    }

    #[test]
    fn buckets_follow_priority_order() {
        assert_eq!(verdict(Category::Photo, None).bucket(), Bucket::ShouldProcess);
        // Too small wins over the icon category.
        let too_small = SkipReason::TooSmall {
            width: 10,
            height: 10,
            min_dimension: 50,
        };
        assert_eq!(
            verdict(Category::Icon, Some(too_small)).bucket(),
            Bucket::SkipTooSmall
        );
        assert_eq!(
            verdict(Category::Logo, Some(SkipReason::LikelyLogo { relevance: 0.3 })).bucket(),
            Bucket::SkipLogoIcon
        );
        assert_eq!(
            verdict(
                Category::Decorative,
                Some(SkipReason::PredictedCategory(Category::Decorative))
            )
            .bucket(),
            Bucket::SkipDecorative
        );
        let low = SkipReason::LowRelevance {
            relevance: 0.2,
            threshold: 0.3,
        };
        assert_eq!(
            verdict(Category::Unknown, Some(low)).bucket(),
            Bucket::SkipLowRelevance
        );
    }

    #[test]
    fn resize_outcome_json_shape() {
        let out = ResizeOutcome::downscaled((5000, 1000), (4800, 960), 0.96, Path::new("o.png"));
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["resized"], true);
        assert_eq!(v["scale_factor"], 0.96);
        assert!(v.get("skipped").is_none());

        let skipped = ResizeOutcome::skipped(30, 30, "Image too small: 30x30");
        let v = serde_json::to_value(&skipped).unwrap();
        assert_eq!(v["skipped"], true);
        assert!(v.get("output_width").is_none());
        assert!(v.get("output_path").is_none());
    }

    #[test]
    fn failed_entry_json_shape() {
        let entry = BatchEntry::failed(
            PathBuf::from("/x/bad.png"),
            EntryError::DecodeFailed {
                detail: "eof".into(),
            },
        );
        let v = serde_json::to_value(&entry).unwrap();
        assert_eq!(v["should_vlm"], false);
        assert_eq!(v["error"], "cannot decode image: eof");
        assert!(v.get("category").is_none());
    }

    #[test]
    fn round_to_places() {
        assert_eq!(round_to(0.12345, 3), 0.123);
        assert_eq!(round_to(2.345678, 2), 2.35);
        assert_eq!(round_to(0.96, 4), 0.96);
    }
}
