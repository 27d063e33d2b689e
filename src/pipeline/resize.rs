//! Output resizing for the two downstream consumers.
//!
//! Sizing is split into a pure *plan* (geometry only, trivially testable)
//! and an *apply* step that resamples pixels. Plans never upsample: an
//! image that already fits its bound is kept at its exact dimensions.
//!
//! Resampling uses Lanczos3. Aliasing from a cheaper filter would add
//! spurious colours and edges, biasing any later re-analysis of the output.
//! This is unrelated to the nearest-neighbour sampling in
//! [`crate::pipeline::colors`], which must not smooth.

use crate::config::{OcrProfile, ResizeProfile, VlmProfile};
use image::imageops::FilterType;
use image::DynamicImage;
use std::fmt;
use tracing::debug;

/// What a profile wants done with an image of a given size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizePlan {
    /// Already within bounds; write through at the original size.
    Keep,
    /// Downscale to exactly `width` x `height`; `scale` is in `(0, 1)`.
    Downscale { width: u32, height: u32, scale: f64 },
    /// Too small to be worth sending anywhere; produce no output.
    Skip {
        width: u32,
        height: u32,
        min_dimension: u32,
    },
}

impl fmt::Display for ResizePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizePlan::Keep => f.write_str("keep"),
            ResizePlan::Downscale {
                width,
                height,
                scale,
            } => write!(f, "downscale to {width}x{height} (x{scale:.4})"),
            ResizePlan::Skip {
                width,
                height,
                min_dimension,
            } => write!(f, "Image too small: {width}x{height} < {min_dimension}px"),
        }
    }
}

pub fn plan(width: u32, height: u32, profile: &ResizeProfile) -> ResizePlan {
    match profile {
        ResizeProfile::Ocr(p) => plan_ocr(width, height, p),
        ResizeProfile::Vlm(p) => plan_vlm(width, height, p),
    }
}

/// Width-capped plan: only the width is bounded, height follows.
pub fn plan_ocr(width: u32, height: u32, profile: &OcrProfile) -> ResizePlan {
    let bound = profile.max_width.max(1);
    if width <= bound {
        return ResizePlan::Keep;
    }
    let scale = f64::from(bound) / f64::from(width);
    ResizePlan::Downscale {
        width: bound,
        height: scaled(height, scale),
        scale,
    }
}

/// Longest-side-capped plan with a lower cut-off.
pub fn plan_vlm(width: u32, height: u32, profile: &VlmProfile) -> ResizePlan {
    let longest = width.max(height);
    if longest < profile.skip_below {
        return ResizePlan::Skip {
            width,
            height,
            min_dimension: profile.skip_below,
        };
    }

    let bound = profile.max_dimension.max(1);
    if longest <= bound {
        return ResizePlan::Keep;
    }

    let scale = f64::from(bound) / f64::from(longest);
    // Pin the longest side to the bound exactly; round the other one.
    let (out_w, out_h) = if width >= height {
        (bound, scaled(height, scale))
    } else {
        (scaled(width, scale), bound)
    };
    ResizePlan::Downscale {
        width: out_w,
        height: out_h,
        scale,
    }
}

fn scaled(len: u32, scale: f64) -> u32 {
    ((f64::from(len) * scale).round() as u32).max(1)
}

/// Resample `img` to exactly `width` x `height` with Lanczos3.
pub fn apply(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    debug!(
        "Lanczos3 resample {}x{} → {}x{}",
        img.width(),
        img.height(),
        width,
        height
    );
    img.resize_exact(width, height, FilterType::Lanczos3)
}
