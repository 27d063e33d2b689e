//! Category prediction from dimensions and colour statistics.
//!
//! The classifier is an ordered table of `(predicate, category)` rules,
//! evaluated top to bottom; the first match wins. Precedence is therefore
//! data, not control flow: reordering [`RULES`] is the only way to change
//! which rule beats which, and each predicate can be tested on its own.
//!
//! | # | Rule | Category |
//! |---|------|----------|
//! | 1 | longest side < 64 | Icon |
//! | 2 | < 8 colours and longest side < 200 | Icon |
//! | 3 | < 16 colours and longest side < 400 | Logo |
//! | 4 | aspect ratio > 6 | Decorative |
//! | 5 | diversity > 0.7 and area > 200² | Photo |
//! | 6 | 16 ≤ colours < 256 and ratio < 2 | Chart |
//! | 7 | 16 ≤ colours < 256 | Document |
//! | 8 | ≥ 256 colours | Photo |
//! | 9 | anything else | Unknown |

use crate::output::{Category, ColorSample};
use crate::raster::aspect_ratio;

/// Longest side below which any image is an icon.
pub const ICON_MAX_DIMENSION: u32 = 64;
/// Colour count below which a small image is an icon.
pub const ICON_COLOR_THRESHOLD: u32 = 8;
/// Longest side below which a low-colour image is an icon.
pub const ICON_COLOR_MAX_DIMENSION: u32 = 200;
/// Colour count below which a mid-sized image is a logo.
pub const LOGO_COLOR_THRESHOLD: u32 = 16;
/// Longest side below which a low-colour image is a logo.
pub const LOGO_MAX_DIMENSION: u32 = 400;
/// Aspect ratio above which an image is a banner or separator.
pub const DECORATIVE_ASPECT_RATIO: f64 = 6.0;
/// Diversity above which a large image is a photo.
pub const PHOTO_DIVERSITY: f64 = 0.7;
/// Area above which a diverse image is a photo (a 200 px square).
pub const PHOTO_MIN_AREA: u64 = 200 * 200;
/// Colour count at which an image counts as photographic.
pub const PHOTO_COLOR_THRESHOLD: u32 = 256;
/// Aspect ratio below which a moderate-colour image is a chart.
pub const CHART_MAX_ASPECT_RATIO: f64 = 2.0;

/// Everything the rules look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub width: u32,
    pub height: u32,
    pub unique_colors: u32,
    pub diversity_score: f64,
}

impl Features {
    pub fn new(width: u32, height: u32, colors: &ColorSample) -> Self {
        Self {
            width,
            height,
            unique_colors: colors.unique_colors,
            diversity_score: colors.diversity_score,
        }
    }

    pub fn max_dimension(&self) -> u32 {
        self.width.max(self.height)
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn aspect_ratio(&self) -> f64 {
        aspect_ratio(self.width, self.height)
    }

    fn moderate_colors(&self) -> bool {
        (LOGO_COLOR_THRESHOLD..PHOTO_COLOR_THRESHOLD).contains(&self.unique_colors)
    }
}

/// One classification rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&Features) -> bool,
    pub category: Category,
}

/// The rule table, in precedence order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "tiny",
        matches: |f| f.max_dimension() < ICON_MAX_DIMENSION,
        category: Category::Icon,
    },
    Rule {
        name: "few-colours-small",
        matches: |f| {
            f.unique_colors < ICON_COLOR_THRESHOLD && f.max_dimension() < ICON_COLOR_MAX_DIMENSION
        },
        category: Category::Icon,
    },
    Rule {
        name: "few-colours-medium",
        matches: |f| f.unique_colors < LOGO_COLOR_THRESHOLD && f.max_dimension() < LOGO_MAX_DIMENSION,
        category: Category::Logo,
    },
    Rule {
        name: "extreme-aspect",
        matches: |f| f.aspect_ratio() > DECORATIVE_ASPECT_RATIO,
        category: Category::Decorative,
    },
    Rule {
        name: "diverse-large",
        matches: |f| f.diversity_score > PHOTO_DIVERSITY && f.area() > PHOTO_MIN_AREA,
        category: Category::Photo,
    },
    Rule {
        name: "moderate-colours-compact",
        matches: |f| f.moderate_colors() && f.aspect_ratio() < CHART_MAX_ASPECT_RATIO,
        category: Category::Chart,
    },
    Rule {
        name: "moderate-colours-elongated",
        matches: |f| f.moderate_colors(),
        category: Category::Document,
    },
    Rule {
        name: "many-colours",
        matches: |f| f.unique_colors >= PHOTO_COLOR_THRESHOLD,
        category: Category::Photo,
    },
    Rule {
        name: "fallback",
        matches: |_| true,
        category: Category::Unknown,
    },
];

/// The first rule in [`RULES`] that matches `features`.
pub fn first_match(features: &Features) -> Option<&'static Rule> {
    RULES.iter().find(|rule| (rule.matches)(features))
}

/// Predict the category of an image. Always returns a category.
pub fn classify(features: &Features) -> Category {
    first_match(features)
        .map(|rule| rule.category)
        .unwrap_or(Category::Unknown)
}
