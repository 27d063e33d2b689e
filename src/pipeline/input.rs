//! Input resolution: validate a user-supplied path, decode it, or list the
//! candidate images of a directory.
//!
//! Decoding sniffs the format from the file's bytes rather than trusting
//! its extension, so a mislabelled PNG still decodes and a truncated JPEG
//! surfaces as [`RelevanceError::DecodeFailed`] instead of a panic deep
//! inside a codec.

use crate::error::RelevanceError;
use image::{DynamicImage, ImageReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extensions a directory scan treats as images (compared lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "tiff", "tif"];

/// Whether `path` carries one of [`IMAGE_EXTENSIONS`], case-insensitively.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// Validate that `path` exists and is readable.
pub fn resolve_local(path: &Path) -> Result<PathBuf, RelevanceError> {
    if !path.exists() {
        return Err(RelevanceError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(RelevanceError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(RelevanceError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Resolved local image: {}", path.display());
    Ok(path.to_path_buf())
}

/// Open and decode the image at `path`.
pub fn decode_image(path: &Path) -> Result<DynamicImage, RelevanceError> {
    let path = resolve_local(path)?;

    let reader = ImageReader::open(&path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => RelevanceError::PermissionDenied {
                path: path.clone(),
            },
            _ => RelevanceError::DecodeFailed {
                path: path.clone(),
                detail: e.to_string(),
            },
        })?;

    let image = reader.decode().map_err(|e| RelevanceError::DecodeFailed {
        path: path.clone(),
        detail: e.to_string(),
    })?;

    debug!(
        "Decoded {} → {}x{} {:?}",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );
    Ok(image)
}

/// List the recognised image files directly inside `dir`, sorted by path.
///
/// Subdirectories and files with other extensions are skipped silently.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, RelevanceError> {
    if !dir.exists() {
        return Err(RelevanceError::FileNotFound {
            path: dir.to_path_buf(),
        });
    }
    if !dir.is_dir() {
        return Err(RelevanceError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => RelevanceError::PermissionDenied {
            path: dir.to_path_buf(),
        },
        _ => RelevanceError::Internal(format!("Failed to read '{}': {}", dir.display(), e)),
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry_path(entry, dir))
        .filter(|p| p.is_file() && is_supported_image(p))
        .collect();
    paths.sort();

    debug!("Found {} candidate images in {}", paths.len(), dir.display());
    Ok(paths)
}

/// Path of one `read_dir` entry; unreadable entries are logged and dropped.
fn entry_path(entry: std::io::Result<std::fs::DirEntry>, dir: &Path) -> Option<PathBuf> {
    match entry {
        Ok(entry) => Some(entry.path()),
        Err(e) => {
            warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
            None
        }
    }
}
