//! Relevance scoring: combine the component scores into one verdict.
//!
//! ```text
//! relevance = w.size·size + w.aspect·aspect + w.diversity·diversity
//!           + w.category·bonus[category]
//! ```
//!
//! The skip decision is a cascade; the first matching step decides:
//!
//! 1. longest side < `min_dimension`             → too small
//! 2. category is Icon or Decorative             → predicted category
//! 3. Logo with relevance < `logo_relevance_floor` → likely logo
//! 4. relevance < `min_relevance`                → low relevance
//! 5. otherwise                                  → process

use crate::config::AnalysisConfig;
use crate::output::{Category, ColorSample, GeometryScore, RelevanceVerdict, SkipReason};

/// Weighted relevance in `[0, 1]`.
pub fn overall_relevance(
    colors: &ColorSample,
    geometry: &GeometryScore,
    category: Category,
    config: &AnalysisConfig,
) -> f64 {
    let w = &config.weights;
    let score = w.size * geometry.size_score
        + w.aspect * geometry.aspect_score
        + w.diversity * colors.diversity_score
        + w.category * config.category_bonus.get(category);
    score.clamp(0.0, 1.0)
}

/// Score an image and decide whether it is worth a VLM call.
pub fn score(
    (width, height): (u32, u32),
    colors: &ColorSample,
    geometry: &GeometryScore,
    category: Category,
    config: &AnalysisConfig,
) -> RelevanceVerdict {
    let relevance = overall_relevance(colors, geometry, category, config);

    let skip_reason = if width.max(height) < config.min_dimension {
        Some(SkipReason::TooSmall {
            width,
            height,
            min_dimension: config.min_dimension,
        })
    } else if matches!(category, Category::Icon | Category::Decorative) {
        Some(SkipReason::PredictedCategory(category))
    } else if category == Category::Logo && relevance < config.logo_relevance_floor {
        Some(SkipReason::LikelyLogo { relevance })
    } else if relevance < config.min_relevance {
        Some(SkipReason::LowRelevance {
            relevance,
            threshold: config.min_relevance,
        })
    } else {
        None
    };

    RelevanceVerdict {
        overall_relevance: relevance,
        category,
        skip_reason,
    }
}
