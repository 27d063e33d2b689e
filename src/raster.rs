//! The pixel-access capability the analysis stages work against.
//!
//! Decoding belongs to the codec; the heuristics only need dimensions and a
//! way to read one pixel as RGB. Keeping that behind a trait lets callers
//! feed frames from any source (a decoded file, a rendered PDF page, a test
//! buffer) without converting the whole image first, and lets the colour
//! sampler read only the pixels it actually samples.

use image::{DynamicImage, GenericImageView, Pixel, RgbImage};

/// Aspect ratio reported when either dimension is zero.
pub const DEGENERATE_ASPECT_RATIO: f64 = 999.0;

/// A decoded raster image.
pub trait RasterImage {
    /// `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// The pixel at `(x, y)` as 3-channel RGB; alpha, if any, is dropped.
    ///
    /// Callers guarantee `x < width` and `y < height`.
    fn rgb_at(&self, x: u32, y: u32) -> [u8; 3];

    fn aspect_ratio(&self) -> f64 {
        let (w, h) = self.size();
        aspect_ratio(w, h)
    }
}

/// `max(w, h) / min(w, h)`, or [`DEGENERATE_ASPECT_RATIO`] if either is 0.
pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    let (long, short) = (width.max(height), width.min(height));
    if short == 0 {
        DEGENERATE_ASPECT_RATIO
    } else {
        f64::from(long) / f64::from(short)
    }
}

impl RasterImage for DynamicImage {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        self.get_pixel(x, y).to_rgb().0
    }
}

impl RasterImage for RgbImage {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        self.get_pixel(x, y).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgba, RgbaImage};

    #[test]
    fn aspect_ratio_is_orientation_independent() {
        assert_eq!(aspect_ratio(600, 100), 6.0);
        assert_eq!(aspect_ratio(100, 600), 6.0);
        assert_eq!(aspect_ratio(10, 10), 1.0);
    }

    #[test]
    fn degenerate_dimensions_use_sentinel() {
        assert_eq!(aspect_ratio(0, 10), DEGENERATE_ASPECT_RATIO);
        assert_eq!(aspect_ratio(10, 0), DEGENERATE_ASPECT_RATIO);
    }

    #[test]
    fn dynamic_image_drops_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 3, Rgba([10, 20, 30, 0])));
        assert_eq!(img.size(), (2, 3));
        assert_eq!(img.rgb_at(1, 2), [10, 20, 30]);
    }

    #[test]
    fn grayscale_expands_to_rgb() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([77])));
        assert_eq!(img.rgb_at(0, 0), [77, 77, 77]);
        assert_eq!(RasterImage::aspect_ratio(&img), 1.0);
    }
}
