//! Core framing and composition primitives for roundel card generation.
//!
//! Turns an arbitrary-aspect photo into a well-centered square crop (face
//! detection with a deterministic center fallback), then places a circular
//! cutout of it at a fixed, content-independent position on a template image.

/// Resize, circular masking, and deterministic template placement.
pub mod compositor;
/// Face detection capability trait and the built-in cascade backend.
pub mod detector;
/// Error types shared across the workspace.
pub mod error;
/// Square crop planning and the face-aware framer.
pub mod framer;
/// Composition profiles (behavioral configuration as data).
pub mod profile;

pub use compositor::{QUADRANT_NUDGE_PX, circular_mask, compose, paste_position, target_size};
#[cfg(feature = "rustface")]
pub use detector::RustfaceDetector;
pub use detector::{FaceBox, FaceDetector, largest_face};
pub use error::CardError;
pub use framer::{CropBox, CropDecision, Framer, center_crop_box, face_crop_box};
pub use profile::{CompositionProfile, PlacementMode, standard_profiles};

/// Returns the crate version for diagnostics.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
