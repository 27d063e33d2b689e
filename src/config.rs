//! Configuration types for relevance analysis and resizing.
//!
//! All analysis behaviour is controlled through [`AnalysisConfig`], built via
//! its [`AnalysisConfigBuilder`]. Every threshold and weight the heuristic
//! uses lives here and travels as an explicit parameter; nothing in the
//! crate reads module-level mutable state.
//!
//! Resizing is configured separately by one of two named profiles,
//! [`OcrProfile`] and [`VlmProfile`], because the two consumers impose
//! unrelated limits (a hard width ceiling vs. a token-budget dimension cap).
//!
//! The size steps and the score weights are empirical constants. They are
//! exposed as overridable fields rather than baked in.

use crate::error::RelevanceError;
use crate::output::Category;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Defaults ─────────────────────────────────────────────────────────────

/// Pixels sampled for colour counting. Larger images are nearest-neighbour
/// downsampled to roughly this many pixels first.
pub const DEFAULT_SAMPLE_SIZE: u32 = 10_000;

/// Images whose longest side is below this are never sent to the VLM.
pub const MIN_DIMENSION_VLM: u32 = 50;

/// Relevance below this is skipped as "low relevance".
pub const MIN_RELEVANCE_SCORE: f64 = 0.3;

/// A predicted logo is only kept when its relevance reaches this floor.
pub const LOGO_RELEVANCE_FLOOR: f64 = 0.4;

/// Width ceiling of the OCR service.
pub const OCR_MAX_WIDTH: u32 = 4800;

/// Longest-side ceiling for VLM input.
pub const VLM_MAX_DIMENSION: u32 = 2048;

/// Pixel area of a 50 px square: below this an image scores 0.0 on size.
pub const AREA_TINY: u64 = 50 * 50;
/// Pixel area of a 100 px square.
pub const AREA_VERY_SMALL: u64 = 100 * 100;
/// Pixel area of a 200 px square.
pub const AREA_SMALL: u64 = 200 * 200;
/// Pixel area of a 400 px square: at or above this an image scores 1.0.
pub const AREA_MEDIUM: u64 = 400 * 400;

// ── Scoring tables ───────────────────────────────────────────────────────

/// Weights of the four relevance components. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub size: f64,
    pub aspect: f64,
    pub diversity: f64,
    pub category: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            size: 0.30,
            aspect: 0.20,
            diversity: 0.30,
            category: 0.20,
        }
    }
}

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.size + self.aspect + self.diversity + self.category
    }
}

/// Stepped size score: area thresholds (exclusive upper bounds) and the
/// score assigned below each, plus the score for anything larger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeSteps {
    /// Ascending area thresholds, in pixels.
    pub thresholds: [u64; 4],
    /// `scores[i]` applies when `area < thresholds[i]`; `scores[4]` otherwise.
    pub scores: [f64; 5],
}

impl Default for SizeSteps {
    fn default() -> Self {
        Self {
            thresholds: [AREA_TINY, AREA_VERY_SMALL, AREA_SMALL, AREA_MEDIUM],
            scores: [0.0, 0.2, 0.4, 0.7, 1.0],
        }
    }
}

/// Per-category contribution to the relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryBonus {
    pub photo: f64,
    pub chart: f64,
    pub document: f64,
    pub logo: f64,
    pub icon: f64,
    pub decorative: f64,
    pub unknown: f64,
}

impl Default for CategoryBonus {
    fn default() -> Self {
        Self {
            photo: 1.0,
            chart: 1.0,
            document: 0.9,
            logo: 0.2,
            icon: 0.1,
            decorative: 0.1,
            unknown: 0.5,
        }
    }
}

impl CategoryBonus {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Photo => self.photo,
            Category::Chart => self.chart,
            Category::Document => self.document,
            Category::Logo => self.logo,
            Category::Icon => self.icon,
            Category::Decorative => self.decorative,
            Category::Unknown => self.unknown,
        }
    }
}

// ── AnalysisConfig ───────────────────────────────────────────────────────

/// Configuration for relevance analysis of single images and directories.
///
/// # Example
/// ```rust
/// use image_relevance::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .min_relevance(0.5)
///     .concurrency(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.min_relevance, 0.5);
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Target pixel count for the colour-counting sample. Default: 10 000.
    pub sample_size: u32,

    /// Longest side below which an image is "too small". Default: 50.
    pub min_dimension: u32,

    /// Relevance below which an image is skipped. Default: 0.3.
    pub min_relevance: f64,

    /// Relevance a predicted logo needs to be kept. Default: 0.4.
    pub logo_relevance_floor: f64,

    /// Component weights of the relevance score.
    pub weights: ScoreWeights,

    /// Stepped size-score table.
    pub size_steps: SizeSteps,

    /// Per-category bonus table.
    pub category_bonus: CategoryBonus,

    /// Maximum files analysed at once by a directory scan.
    /// Default: available parallelism.
    pub concurrency: usize,

    /// Optional receiver of per-file batch events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            min_dimension: MIN_DIMENSION_VLM,
            min_relevance: MIN_RELEVANCE_SCORE,
            logo_relevance_floor: LOGO_RELEVANCE_FLOOR,
            weights: ScoreWeights::default(),
            size_steps: SizeSteps::default(),
            category_bonus: CategoryBonus::default(),
            concurrency: default_concurrency(),
            progress_callback: None,
        }
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("sample_size", &self.sample_size)
            .field("min_dimension", &self.min_dimension)
            .field("min_relevance", &self.min_relevance)
            .field("logo_relevance_floor", &self.logo_relevance_floor)
            .field("weights", &self.weights)
            .field("size_steps", &self.size_steps)
            .field("category_bonus", &self.category_bonus)
            .field("concurrency", &self.concurrency)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn sample_size(mut self, n: u32) -> Self {
        self.config.sample_size = n.max(1);
        self
    }

    pub fn min_dimension(mut self, px: u32) -> Self {
        self.config.min_dimension = px;
        self
    }

    pub fn min_relevance(mut self, score: f64) -> Self {
        self.config.min_relevance = score;
        self
    }

    pub fn logo_relevance_floor(mut self, score: f64) -> Self {
        self.config.logo_relevance_floor = score;
        self
    }

    pub fn weights(mut self, weights: ScoreWeights) -> Self {
        self.config.weights = weights;
        self
    }

    pub fn size_steps(mut self, steps: SizeSteps) -> Self {
        self.config.size_steps = steps;
        self
    }

    pub fn category_bonus(mut self, bonus: CategoryBonus) -> Self {
        self.config.category_bonus = bonus;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, RelevanceError> {
        let c = &self.config;
        if !(0.0..=1.0).contains(&c.min_relevance) {
            return Err(RelevanceError::InvalidConfig(format!(
                "min_relevance must be within 0–1, got {}",
                c.min_relevance
            )));
        }
        if !(0.0..=1.0).contains(&c.logo_relevance_floor) {
            return Err(RelevanceError::InvalidConfig(format!(
                "logo_relevance_floor must be within 0–1, got {}",
                c.logo_relevance_floor
            )));
        }
        let w = &c.weights;
        if [w.size, w.aspect, w.diversity, w.category]
            .iter()
            .any(|v| *v < 0.0)
        {
            return Err(RelevanceError::InvalidConfig(
                "score weights must be non-negative".into(),
            ));
        }
        if (w.total() - 1.0).abs() > 1e-6 {
            return Err(RelevanceError::InvalidConfig(format!(
                "score weights must sum to 1.0, got {:.4}",
                w.total()
            )));
        }
        if !c.size_steps.thresholds.windows(2).all(|p| p[0] <= p[1]) {
            return Err(RelevanceError::InvalidConfig(
                "size thresholds must be ascending".into(),
            ));
        }
        if c
            .size_steps
            .scores
            .iter()
            .any(|s| !(0.0..=1.0).contains(s))
        {
            return Err(RelevanceError::InvalidConfig(
                "size scores must be within 0–1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Resize profiles ──────────────────────────────────────────────────────

/// Resize profile for the text-extraction service: caps width only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrProfile {
    /// Maximum output width in pixels. Default: 4800.
    pub max_width: u32,
}

impl Default for OcrProfile {
    fn default() -> Self {
        Self {
            max_width: OCR_MAX_WIDTH,
        }
    }
}

impl OcrProfile {
    pub fn new(max_width: u32) -> Self {
        Self {
            max_width: max_width.max(1),
        }
    }
}

/// Resize profile for the visual-analysis service: caps the longest side
/// and refuses images too small to be worth a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlmProfile {
    /// Maximum output width or height in pixels. Default: 2048.
    pub max_dimension: u32,
    /// Images whose longest side is below this are skipped. Default: 50.
    pub skip_below: u32,
}

impl Default for VlmProfile {
    fn default() -> Self {
        Self {
            max_dimension: VLM_MAX_DIMENSION,
            skip_below: MIN_DIMENSION_VLM,
        }
    }
}

impl VlmProfile {
    pub fn new(max_dimension: u32) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
            ..Self::default()
        }
    }

    pub fn skip_below(mut self, px: u32) -> Self {
        self.skip_below = px;
        self
    }
}

/// Selects one of the two named resize profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeProfile {
    Ocr(OcrProfile),
    Vlm(VlmProfile),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = AnalysisConfig::default();
        assert_eq!(c.sample_size, 10_000);
        assert_eq!(c.min_dimension, 50);
        assert_eq!(c.min_relevance, 0.3);
        assert_eq!(c.logo_relevance_floor, 0.4);
        assert!((c.weights.total() - 1.0).abs() < 1e-9);
        assert_eq!(c.size_steps.thresholds, [2500, 10_000, 40_000, 160_000]);
        assert!(c.concurrency >= 1);
    }

    #[test]
    fn builder_rejects_unbalanced_weights() {
        let err = AnalysisConfig::builder()
            .weights(ScoreWeights {
                size: 0.5,
                aspect: 0.5,
                diversity: 0.5,
                category: 0.0,
            })
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("sum to 1.0"), "got: {err}");
    }

    #[test]
    fn builder_rejects_out_of_range_relevance() {
        assert!(AnalysisConfig::builder().min_relevance(1.5).build().is_err());
        assert!(AnalysisConfig::builder().min_relevance(-0.1).build().is_err());
    }

    #[test]
    fn builder_clamps_concurrency_and_sample_size() {
        let c = AnalysisConfig::builder()
            .concurrency(0)
            .sample_size(0)
            .build()
            .unwrap();
        assert_eq!(c.concurrency, 1);
        assert_eq!(c.sample_size, 1);
    }

    #[test]
    fn category_bonus_lookup() {
        let b = CategoryBonus::default();
        assert_eq!(b.get(Category::Photo), 1.0);
        assert_eq!(b.get(Category::Document), 0.9);
        assert_eq!(b.get(Category::Unknown), 0.5);
        assert_eq!(b.get(Category::Decorative), 0.1);
    }

    #[test]
    fn profile_defaults() {
        assert_eq!(OcrProfile::default().max_width, 4800);
        let vlm = VlmProfile::default();
        assert_eq!(vlm.max_dimension, 2048);
        assert_eq!(vlm.skip_below, 50);
        assert_eq!(VlmProfile::new(1024).skip_below(10).skip_below, 10);
    }
}
