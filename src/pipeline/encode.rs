//! Image encoding: write a `DynamicImage` to the requested output path.
//!
//! The output format follows the output file's extension. JPEG is written
//! at quality 95, enough headroom that recompression does not blur fine
//! print for the OCR service. Writes are atomic: the image is encoded into
//! a temp file in the destination directory and renamed over the target,
//! so a crash never leaves a half-written image behind.

use crate::error::RelevanceError;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// JPEG quality used for every JPEG output.
pub const JPEG_QUALITY: u8 = 95;

/// Formats the crate is built to encode.
const WRITABLE_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
];

/// Output format for `path`, from its extension.
pub fn output_format(path: &Path) -> Result<ImageFormat, RelevanceError> {
    ImageFormat::from_path(path)
        .ok()
        .filter(|f| WRITABLE_FORMATS.contains(f))
        .ok_or_else(|| RelevanceError::UnsupportedOutputFormat {
            path: path.to_path_buf(),
        })
}

/// Encode `img` and atomically write it to `path`, creating parent
/// directories as needed.
pub fn write_image(img: &DynamicImage, path: &Path) -> Result<(), RelevanceError> {
    let format = output_format(path)?;
    let write_err = |source: std::io::Error| RelevanceError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".imgrel-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(write_err)?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        encode_into(img, format, &mut writer).map_err(|e| RelevanceError::EncodeFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        writer.flush().map_err(write_err)?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error))?;
    debug!(
        "Wrote {}x{} {:?} → {}",
        img.width(),
        img.height(),
        format,
        path.display()
    );
    Ok(())
}

fn encode_into<W: Write + std::io::Seek>(
    img: &DynamicImage,
    format: ImageFormat,
    writer: &mut W,
) -> Result<(), image::ImageError> {
    match format {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel.
            let rgb = img.to_rgb8();
            JpegEncoder::new_with_quality(writer, JPEG_QUALITY).encode_image(&rgb)
        }
        ImageFormat::Png | ImageFormat::Tiff => img.write_to(writer, format),
        _ => {
            // The remaining encoders only take 8-bit RGB(A).
            let normalised = if img.color().has_alpha() {
                DynamicImage::ImageRgba8(img.to_rgba8())
            } else {
                DynamicImage::ImageRgb8(img.to_rgb8())
            };
            normalised.write_to(writer, format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn sample() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(12, 8, Rgba([255, 0, 0, 128])))
    }

    #[test]
    fn output_format_from_extension() {
        assert_eq!(output_format(Path::new("a.PNG")).unwrap(), ImageFormat::Png);
        assert_eq!(output_format(Path::new("a.jpeg")).unwrap(), ImageFormat::Jpeg);
        assert!(matches!(
            output_format(Path::new("a.txt")).unwrap_err(),
            RelevanceError::UnsupportedOutputFormat { .. }
        ));
        assert!(output_format(Path::new("noext")).is_err());
    }

    #[test]
    fn writes_png_and_jpeg_with_alpha_input() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["out.png", "out.jpg", "out.bmp"] {
            let path = dir.path().join(name);
            write_image(&sample(), &path).expect("write should succeed");
            let back = image::open(&path).expect("written file decodes");
            assert_eq!((back.width(), back.height()), (12, 8));
        }
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c/out.png");
        write_image(&sample(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        write_image(&sample(), &dir.path().join("x.png")).unwrap();
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
