//! Error types for the image-relevance library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`RelevanceError`] — **Fatal**: the requested operation cannot proceed
//!   at all (missing file, undecodable bytes, unwritable output). Returned as
//!   `Err(RelevanceError)` from [`crate::analyze_image`] and the resize
//!   entry points.
//!
//! * [`EntryError`] — **Non-fatal**: a single file in a directory scan failed
//!   but every other file is fine. Stored inside
//!   [`crate::output::BatchEntry::Failed`] so one corrupt image never costs
//!   the caller the rest of the batch.
//!
//! Files whose extension is not a recognised image type are not errors at
//! all; the directory scan simply leaves them out.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the image-relevance library.
#[derive(Debug, Error)]
pub enum RelevanceError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file or directory was not found at the given path.
    #[error("File not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// A directory scan was requested on something that is not a directory.
    #[error("Not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    /// The file was read but its bytes are not a decodable image.
    #[error("Cannot decode image '{path}': {detail}")]
    DecodeFailed { path: PathBuf, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The output path has no extension we know how to encode.
    #[error("Unsupported output format for '{path}'; use .png, .jpg, .webp, .gif, .bmp or .tiff")]
    UnsupportedOutputFormat { path: PathBuf },

    /// Encoding the resized image failed.
    #[error("Failed to encode image for '{path}': {detail}")]
    EncodeFailed { path: PathBuf, detail: String },

    /// Could not create or write the output image file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single file in a directory scan.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EntryError {
    /// The file could not be opened or read.
    #[error("cannot read file: {detail}")]
    Unreadable { detail: String },

    /// The bytes are not a decodable image.
    #[error("cannot decode image: {detail}")]
    DecodeFailed { detail: String },

    /// The worker analysing the file panicked or was cancelled.
    #[error("analysis task failed: {detail}")]
    TaskFailed { detail: String },
}

impl From<RelevanceError> for EntryError {
    fn from(e: RelevanceError) -> Self {
        match e {
            RelevanceError::DecodeFailed { detail, .. } => EntryError::DecodeFailed { detail },
            other => EntryError::Unreadable {
                detail: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = RelevanceError::FileNotFound {
            path: PathBuf::from("/tmp/missing.png"),
        };
        assert!(e.to_string().contains("missing.png"), "got: {e}");
    }

    #[test]
    fn decode_failure_becomes_entry_decode_error() {
        let e = RelevanceError::DecodeFailed {
            path: PathBuf::from("broken.png"),
            detail: "bad signature".into(),
        };
        let entry: EntryError = e.into();
        assert_eq!(
            entry,
            EntryError::DecodeFailed {
                detail: "bad signature".into()
            }
        );
        assert!(entry.to_string().contains("bad signature"));
    }

    #[test]
    fn other_failures_become_unreadable() {
        let e = RelevanceError::PermissionDenied {
            path: PathBuf::from("locked.png"),
        };
        let entry: EntryError = e.into();
        assert!(matches!(entry, EntryError::Unreadable { .. }));
        assert!(entry.to_string().contains("locked.png"));
    }
}
