//! Geometry scoring: size and aspect components from raw dimensions.

use crate::config::SizeSteps;
use crate::output::GeometryScore;
use crate::raster::aspect_ratio;

/// Ratios up to this score a full 1.0 (covers 1:1 through 2:1).
pub const NORMAL_ASPECT_RATIO: f64 = 2.0;

/// Past this ratio an image reads as a banner or rule.
pub const EXTREME_ASPECT_RATIO: f64 = 4.0;

/// Floor of the aspect score for extreme ratios.
const MIN_EXTREME_ASPECT_SCORE: f64 = 0.1;

pub fn score_geometry(width: u32, height: u32, steps: &SizeSteps) -> GeometryScore {
    GeometryScore {
        size_score: size_score(width, height, steps),
        aspect_score: aspect_score(width, height),
    }
}

/// Aspect-ratio score: 1.0 up to 2:1, linear decay to 0.5 at 4:1, then
/// 0.1 lost per unit of ratio down to a floor of 0.1. Zero-sized images
/// score 0.0.
pub fn aspect_score(width: u32, height: u32) -> f64 {
    if width == 0 || height == 0 {
        return 0.0;
    }
    let ratio = aspect_ratio(width, height);

    let score = if ratio <= NORMAL_ASPECT_RATIO {
        1.0
    } else if ratio <= EXTREME_ASPECT_RATIO {
        1.0 - 0.5 * (ratio - NORMAL_ASPECT_RATIO) / (EXTREME_ASPECT_RATIO - NORMAL_ASPECT_RATIO)
    } else {
        (0.5 - 0.1 * (ratio - EXTREME_ASPECT_RATIO)).max(MIN_EXTREME_ASPECT_SCORE)
    };
    score.clamp(0.0, 1.0)
}

/// Stepped size score over pixel area.
pub fn size_score(width: u32, height: u32, steps: &SizeSteps) -> f64 {
    let area = u64::from(width) * u64::from(height);
    let idx = steps
        .thresholds
        .iter()
        .position(|&limit| area < limit)
        .unwrap_or(steps.thresholds.len());
    steps.scores[idx].clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_ratios_score_full() {
        assert_eq!(aspect_score(100, 100), 1.0);
        assert_eq!(aspect_score(200, 100), 1.0);
        assert_eq!(aspect_score(100, 200), 1.0);
    }

    #[test]
    fn moderate_ratios_decay_linearly() {
        assert_eq!(aspect_score(300, 100), 0.75);
        assert_eq!(aspect_score(400, 100), 0.5);
    }

    #[test]
    fn extreme_ratios_bottom_out() {
        assert!((aspect_score(500, 100) - 0.4).abs() < 1e-12);
        assert!((aspect_score(600, 100) - 0.3).abs() < 1e-12);
        assert_eq!(aspect_score(1000, 10), 0.1);
    }

    #[test]
    fn zero_dimension_scores_zero() {
        assert_eq!(aspect_score(0, 100), 0.0);
        assert_eq!(aspect_score(100, 0), 0.0);
    }

    #[test]
    fn size_steps_at_square_boundaries() {
        let s = SizeSteps::default();
        assert_eq!(size_score(40, 40, &s), 0.0);
        assert_eq!(size_score(49, 51, &s), 0.0);
        assert_eq!(size_score(50, 50, &s), 0.2);
        assert_eq!(size_score(99, 100, &s), 0.2);
        assert_eq!(size_score(100, 100, &s), 0.4);
        assert_eq!(size_score(200, 200, &s), 0.7);
        assert_eq!(size_score(399, 400, &s), 0.7);
        assert_eq!(size_score(400, 400, &s), 1.0);
        assert_eq!(size_score(5000, 5000, &s), 1.0);
    }

    #[test]
    fn custom_steps_are_honoured() {
        let s = SizeSteps {
            thresholds: [10, 20, 30, 40],
            scores: [0.0, 0.25, 0.5, 0.75, 1.0],
        };
        assert_eq!(size_score(5, 5, &s), 0.5);
        assert_eq!(size_score(7, 7, &s), 1.0);
    }
}
