//! Error types shared across the roundel workspace.

use std::path::PathBuf;

use thiserror::Error;

/// Error returned by card generation operations.
///
/// `TemplateNotFound` and `InputDirectoryNotFound` are fatal: the driver
/// aborts the whole batch before processing any file. Every other variant is
/// a per-file condition that the driver logs and skips past.
#[derive(Debug, Error)]
pub enum CardError {
    /// The template background image does not exist; nothing to composite against.
    #[error("template image not found: {0}")]
    TemplateNotFound(PathBuf),

    /// The input directory does not exist.
    #[error("input directory not found: {0}")]
    InputDirectoryNotFound(PathBuf),

    /// A profile that rejects non-square inputs received one.
    #[error("non-square input rejected ({width}x{height})")]
    NonSquareInput {
        /// Source image width in pixels.
        width: u32,
        /// Source image height in pixels.
        height: u32,
    },

    /// The face detector could not be constructed or produced an unusable result.
    #[error("face detection failed: {0}")]
    Detection(String),

    /// Corrupt or unsupported image data.
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),

    /// The composite could not be encoded or written.
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
}

impl CardError {
    /// Returns true for errors that abort the whole batch rather than a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CardError::TemplateNotFound(_) | CardError::InputDirectoryNotFound(_)
        )
    }
}
