//! Square crop planning and the face-aware framer.
//!
//! The planning functions are pure integer arithmetic over image and face
//! dimensions; [`Framer`] ties them to an optional [`FaceDetector`] and
//! produces the cropped square image together with a diagnostic decision.

use image::{DynamicImage, GenericImageView};
use log::debug;

use crate::detector::{FaceBox, FaceDetector, largest_face};
use crate::error::CardError;

/// Square crop region in source image coordinates.
///
/// Invariant: `side == min(source width, source height)` and the box is fully
/// contained within the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    /// Left edge of the crop (pixels).
    pub left: u32,
    /// Top edge of the crop (pixels).
    pub top: u32,
    /// Side length of the square (pixels).
    pub side: u32,
}

impl CropBox {
    /// Right edge (exclusive).
    pub fn right(&self) -> u32 {
        self.left + self.side
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> u32 {
        self.top + self.side
    }
}

/// How the framer arrived at its crop, for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropDecision {
    /// Input was already square; returned unchanged, no detection performed.
    AlreadySquare,
    /// Crop centered on the largest detected face.
    FaceCentered,
    /// No face detected (or no detector configured); deterministic center crop.
    CenterFallback,
}

impl CropDecision {
    /// Short label for log and report output.
    pub fn as_label(self) -> &'static str {
        match self {
            CropDecision::AlreadySquare => "already-square",
            CropDecision::FaceCentered => "face-centered",
            CropDecision::CenterFallback => "center-fallback",
        }
    }
}

/// Deterministic center crop: `left = (w - side) / 2`, `top = (h - side) / 2`,
/// with integer (floor) division.
///
/// ```rust
/// # use roundel_core::framer::center_crop_box;
/// let crop = center_crop_box(400, 300);
/// assert_eq!(crop.left, 50);
/// assert_eq!(crop.top, 0);
/// assert_eq!(crop.side, 300);
/// ```
pub fn center_crop_box(width: u32, height: u32) -> CropBox {
    let side = width.min(height);
    CropBox {
        left: (width - side) / 2,
        top: (height - side) / 2,
        side,
    }
}

/// Square crop centered on a detected face, clamped into image bounds.
///
/// The crop is centered on the face center `(x + w/2, y + h/2)` using integer
/// floor division. When the centered box would cross an image edge it is
/// shifted back inside; the bounds clamp takes priority over face centering.
pub fn face_crop_box(width: u32, height: u32, face: &FaceBox) -> CropBox {
    let side = width.min(height);
    let (cx, cy) = face.center();
    let half = i64::from(side / 2);

    let mut left = (i64::from(cx) - half).max(0);
    let mut top = (i64::from(cy) - half).max(0);
    if left + i64::from(side) > i64::from(width) {
        left = i64::from(width) - i64::from(side);
    }
    if top + i64::from(side) > i64::from(height) {
        top = i64::from(height) - i64::from(side);
    }

    CropBox {
        left: left as u32,
        top: top as u32,
        side,
    }
}

/// Face-aware square cropper.
///
/// Without a detector every non-square input falls back to the deterministic
/// center crop, so the framer stays usable when no detection backend is
/// available.
#[derive(Default)]
pub struct Framer {
    detector: Option<Box<dyn FaceDetector>>,
}

impl Framer {
    /// Framer with no detection backend (center-fallback only).
    pub fn new() -> Self {
        Self { detector: None }
    }

    /// Framer that consults `detector` for non-square inputs.
    pub fn with_detector(detector: Box<dyn FaceDetector>) -> Self {
        Self {
            detector: Some(detector),
        }
    }

    /// Compute the crop plan for `image` without materializing pixels.
    pub fn plan(&self, image: &DynamicImage) -> Result<(CropBox, CropDecision), CardError> {
        let (width, height) = image.dimensions();
        if width == height {
            return Ok((
                CropBox {
                    left: 0,
                    top: 0,
                    side: width,
                },
                CropDecision::AlreadySquare,
            ));
        }

        if let Some(detector) = self.detector.as_deref() {
            let gray = image.to_luma8();
            let faces = detector.detect(gray.as_raw(), width, height)?;
            if let Some(face) = largest_face(&faces) {
                return Ok((face_crop_box(width, height, face), CropDecision::FaceCentered));
            }
        }

        Ok((center_crop_box(width, height), CropDecision::CenterFallback))
    }

    /// Produce a square image of side `min(width, height)`.
    ///
    /// Already-square inputs are returned unchanged without running detection.
    pub fn crop(&self, image: &DynamicImage) -> Result<(DynamicImage, CropDecision), CardError> {
        let (crop, decision) = self.plan(image)?;
        match decision {
            CropDecision::AlreadySquare => {
                debug!("input already square ({0}x{0}), skipping detection", crop.side);
                Ok((image.clone(), decision))
            }
            CropDecision::FaceCentered | CropDecision::CenterFallback => {
                debug!(
                    "{}: cropping to ({}, {}) side {}",
                    decision.as_label(),
                    crop.left,
                    crop.top,
                    crop.side
                );
                let square = image::imageops::crop_imm(image, crop.left, crop.top, crop.side, crop.side)
                    .to_image();
                Ok((DynamicImage::ImageRgba8(square), decision))
            }
        }
    }
}
