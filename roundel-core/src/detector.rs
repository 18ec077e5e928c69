//! Face detection capability trait and the built-in cascade backend.
//!
//! Detection is deliberately abstracted behind [`FaceDetector`] so the
//! concrete engine can be swapped without touching the framing logic in
//! [`crate::framer`].

use crate::error::CardError;

/// Axis-aligned face bounding box in source pixel coordinates.
///
/// Invariant: the box is fully contained within the image it was detected in
/// (`x + width <= image width`, `y + height <= image height`). Backends are
/// responsible for intersecting raw candidates with the image rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceBox {
    /// X coordinate of the top-left corner (pixels).
    pub x: u32,
    /// Y coordinate of the top-left corner (pixels).
    pub y: u32,
    /// Width of the bounding box (pixels).
    pub width: u32,
    /// Height of the bounding box (pixels).
    pub height: u32,
    /// Detection confidence score (engine-specific scale).
    pub score: f32,
}

impl FaceBox {
    /// Box area in pixels.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Box center using integer (floor) division, matching the crop arithmetic.
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Pluggable face detection backend.
///
/// Implementations receive a row-major grayscale buffer of `width` × `height`
/// bytes and return candidate boxes in engine enumeration order.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a grayscale buffer.
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Result<Vec<FaceBox>, CardError>;
}

/// Select the candidate with strictly maximal `width * height`.
///
/// Ties keep the earliest candidate in detector enumeration order, so the
/// result is deterministic for a deterministic backend.
pub fn largest_face(faces: &[FaceBox]) -> Option<&FaceBox> {
    let mut best: Option<&FaceBox> = None;
    for face in faces {
        match best {
            Some(current) if face.area() <= current.area() => {}
            _ => best = Some(face),
        }
    }
    best
}

/// Clamp a raw candidate rectangle into image bounds.
///
/// Returns `None` when the intersection is empty.
pub fn clamp_face_box(
    x: i64,
    y: i64,
    width: i64,
    height: i64,
    img_w: u32,
    img_h: u32,
    score: f32,
) -> Option<FaceBox> {
    let x1 = x.clamp(0, i64::from(img_w));
    let y1 = y.clamp(0, i64::from(img_h));
    let x2 = (x + width).clamp(0, i64::from(img_w));
    let y2 = (y + height).clamp(0, i64::from(img_h));
    if x2 <= x1 || y2 <= y1 {
        return None;
    }
    Some(FaceBox {
        x: x1 as u32,
        y: y1 as u32,
        width: (x2 - x1) as u32,
        height: (y2 - y1) as u32,
        score,
    })
}

#[cfg(feature = "rustface")]
pub use self::rustface_backend::RustfaceDetector;

#[cfg(feature = "rustface")]
mod rustface_backend {
    use std::{fs, path::Path};

    use super::{FaceBox, FaceDetector, clamp_face_box};
    use crate::error::CardError;

    /// Frontal-face detector backed by the `rustface` crate (SeetaFace cascade).
    pub struct RustfaceDetector {
        model: rustface::Model,
    }

    impl RustfaceDetector {
        /// Load a SeetaFace frontal model from disk.
        pub fn from_model_path<P: AsRef<Path>>(path: P) -> Result<Self, CardError> {
            let path = path.as_ref();
            let bytes = fs::read(path).map_err(|err| {
                CardError::Detection(format!(
                    "failed to read face model {}: {err}",
                    path.display()
                ))
            })?;
            let model = rustface::read_model(std::io::Cursor::new(bytes)).map_err(|err| {
                CardError::Detection(format!(
                    "failed to parse face model {}: {err}",
                    path.display()
                ))
            })?;
            Ok(Self { model })
        }
    }

    impl FaceDetector for RustfaceDetector {
        fn detect(&self, gray: &[u8], width: u32, height: u32) -> Result<Vec<FaceBox>, CardError> {
            let mut detector = rustface::create_detector_with_model(self.model.clone());
            detector.set_min_face_size(20);
            detector.set_score_thresh(2.0);
            detector.set_pyramid_scale_factor(0.8);
            detector.set_slide_window_step(4, 4);

            let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

            Ok(faces
                .iter()
                .filter_map(|face| {
                    let bbox = face.bbox();
                    clamp_face_box(
                        i64::from(bbox.x()),
                        i64::from(bbox.y()),
                        i64::from(bbox.width()),
                        i64::from(bbox.height()),
                        width,
                        height,
                        face.score() as f32,
                    )
                })
                .collect())
        }
    }
}
