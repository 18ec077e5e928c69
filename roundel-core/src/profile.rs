//! Composition profiles.
//!
//! The surrounding system switches behavior between deployments (subject
//! scale, placement, whether detection runs, whether non-square inputs are
//! rejected). Profiles capture that variance as data instead of branches.

use serde::{Deserialize, Serialize};

/// Where the circular subject lands on the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    /// Centered within the bottom-left quadrant, with a +1 px nudge baked in.
    QuadrantCentered,
    /// Subject touches the bottom-left corner exactly.
    FlushBottomLeft,
}

impl PlacementMode {
    /// Parse a CLI/report token.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "quadrant" | "quadrant-centered" | "quadrant_centered" | "centered" => {
                Some(Self::QuadrantCentered)
            }
            "flush" | "flush-bottom-left" | "flush_bottom_left" => Some(Self::FlushBottomLeft),
            _ => None,
        }
    }
}

/// A named behavioral configuration for card generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionProfile {
    /// Profile name for CLI selection and reports.
    pub name: String,
    /// Subject diameter as a fraction of half the template width.
    pub target_fraction: f32,
    /// Placement of the subject on the template.
    pub placement: PlacementMode,
    /// Whether non-square inputs are framed with face detection.
    pub use_face_detection: bool,
    /// Whether non-square inputs are skipped outright instead of cropped.
    pub reject_non_square: bool,
}

impl CompositionProfile {
    /// Original generator behavior: non-square inputs are skipped, subject at
    /// 80% of half the template width, centered in the bottom-left quadrant.
    pub fn strict() -> Self {
        Self {
            name: "strict".to_string(),
            target_fraction: 0.8,
            placement: PlacementMode::QuadrantCentered,
            use_face_detection: false,
            reject_non_square: true,
        }
    }

    /// Naive variant: center-crop everything, subject spans the full half
    /// width, flush against the bottom-left corner.
    pub fn flush() -> Self {
        Self {
            name: "flush".to_string(),
            target_fraction: 1.0,
            placement: PlacementMode::FlushBottomLeft,
            use_face_detection: false,
            reject_non_square: false,
        }
    }

    /// Face-aware variant: detection-guided crops, subject at 90% of half the
    /// template width, centered in the bottom-left quadrant.
    pub fn portrait() -> Self {
        Self {
            name: "portrait".to_string(),
            target_fraction: 0.9,
            placement: PlacementMode::QuadrantCentered,
            use_face_detection: true,
            reject_non_square: false,
        }
    }

    /// Find a standard profile by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        let key = name.trim().to_ascii_lowercase();
        standard_profiles().into_iter().find(|p| p.name == key)
    }

    /// Clamp values into sensible ranges.
    pub fn sanitize(&mut self) {
        if !self.target_fraction.is_finite() {
            self.target_fraction = 1.0;
        }
        self.target_fraction = self.target_fraction.clamp(0.05, 1.0);
    }
}

/// The standard profile catalog.
pub fn standard_profiles() -> Vec<CompositionProfile> {
    vec![
        CompositionProfile::strict(),
        CompositionProfile::flush(),
        CompositionProfile::portrait(),
    ]
}
