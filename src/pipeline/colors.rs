//! Colour diversity: how many distinct colours does an image use?
//!
//! Logos, icons and rules are drawn with a handful of flat colours;
//! photographs and rendered charts use hundreds. Counting distinct colours
//! on a bounded sample is a cheap proxy for "carries visual content".
//!
//! ## Sampling
//!
//! Images larger than `sample_size` pixels are reduced by the linear factor
//! `sqrt(sample_size / total_pixels)` with a **nearest-neighbour** pick.
//! Every sampled pixel is a real pixel of the source. A smoothing filter
//! would blend neighbours into colours the image never contained and
//! inflate the count, so this path deliberately does not share code with
//! [`crate::pipeline::resize`], which uses Lanczos for output quality.

use crate::output::ColorSample;
use crate::raster::RasterImage;
use std::collections::HashSet;
use tracing::debug;

/// Distinct-colour counts above this are reported as the cap itself.
pub const MAX_TRACKED_COLORS: u32 = 65_536;

/// At this many colours the diversity score saturates at 1.0 (`log2 = 8`).
const SATURATING_COLORS: u32 = 256;

/// Count distinct colours on a nearest-neighbour sample of `image`.
pub fn color_diversity(image: &impl RasterImage, sample_size: u32) -> ColorSample {
    let (width, height) = image.size();
    let (sample_w, sample_h) = sample_dimensions(width, height, sample_size);

    let mut seen: HashSet<[u8; 3]> = HashSet::new();
    'rows: for sy in 0..sample_h {
        let y = nearest_source(sy, sample_h, height);
        for sx in 0..sample_w {
            let x = nearest_source(sx, sample_w, width);
            seen.insert(image.rgb_at(x, y));
            if seen.len() > MAX_TRACKED_COLORS as usize {
                break 'rows;
            }
        }
    }

    if seen.len() > MAX_TRACKED_COLORS as usize {
        debug!("Colour count exceeds {}, saturating", MAX_TRACKED_COLORS);
        return ColorSample {
            unique_colors: MAX_TRACKED_COLORS,
            diversity_score: 1.0,
        };
    }

    let unique_colors = seen.len() as u32;
    debug!(
        "Sampled {}x{} of {}x{} → {} colours",
        sample_w, sample_h, width, height, unique_colors
    );

    ColorSample {
        unique_colors,
        diversity_score: diversity_score(unique_colors),
    }
}

/// Normalise a colour count to `[0, 1]` on a log2 scale.
pub fn diversity_score(unique_colors: u32) -> f64 {
    if unique_colors <= 1 {
        0.0
    } else if unique_colors >= SATURATING_COLORS {
        1.0
    } else {
        (f64::from(unique_colors).log2() / 8.0).clamp(0.0, 1.0)
    }
}

/// Dimensions of the colour sample: the full image when it fits in
/// `sample_size` pixels, otherwise both sides scaled by
/// `sqrt(sample_size / total)`, truncated, and at least 1.
pub fn sample_dimensions(width: u32, height: u32, sample_size: u32) -> (u32, u32) {
    let total = u64::from(width) * u64::from(height);
    if total <= u64::from(sample_size) {
        return (width, height);
    }
    let scale = (f64::from(sample_size) / total as f64).sqrt();
    (
        ((f64::from(width) * scale) as u32).max(1),
        ((f64::from(height) * scale) as u32).max(1),
    )
}

/// Source coordinate whose pixel centre is nearest to the centre of
/// sample coordinate `i` when `src_len` is squeezed into `dst_len`.
fn nearest_source(i: u32, dst_len: u32, src_len: u32) -> u32 {
    if dst_len == src_len {
        return i;
    }
    let centre = (f64::from(i) + 0.5) * f64::from(src_len) / f64::from(dst_len);
    (centre as u32).min(src_len.saturating_sub(1))
}
