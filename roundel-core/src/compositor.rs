//! Resize, circular masking, and deterministic template placement.
//!
//! The compositor never inspects subject pixel content when deciding where to
//! paste: target size and paste position are pure functions of the template
//! dimensions and the active [`CompositionProfile`].

use image::{DynamicImage, GenericImageView, RgbaImage, imageops::FilterType};
use log::debug;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use crate::error::CardError;
use crate::profile::{CompositionProfile, PlacementMode};

/// One-pixel nudge applied by the quadrant-centered placement.
///
/// Baked into the observed output; kept verbatim rather than re-derived so
/// existing cards stay pixel-identical.
pub const QUADRANT_NUDGE_PX: i64 = 1;

/// Subject diameter for a template, as a fraction of half the template width.
///
/// Rounded to the nearest pixel; exact for every observed deployment
/// (850 px template: 1.0 → 425, 0.8 → 340).
pub fn target_size(template_width: u32, fraction: f32) -> u32 {
    let half = (template_width / 2) as f32;
    (half * fraction).round().max(1.0) as u32
}

/// Top-left paste position for a subject of `target` pixels on a template.
///
/// A pure function of the template dimensions and the placement mode; image
/// content never influences the result.
///
/// ```rust
/// # use roundel_core::compositor::paste_position;
/// # use roundel_core::profile::PlacementMode;
/// assert_eq!(
///     paste_position(850, 850, 340, PlacementMode::QuadrantCentered),
///     (43, 468)
/// );
/// assert_eq!(
///     paste_position(850, 850, 340, PlacementMode::FlushBottomLeft),
///     (0, 510)
/// );
/// ```
pub fn paste_position(
    template_width: u32,
    template_height: u32,
    target: u32,
    placement: PlacementMode,
) -> (i64, i64) {
    let tw = i64::from(template_width);
    let th = i64::from(template_height);
    let ts = i64::from(target);

    match placement {
        PlacementMode::QuadrantCentered => {
            // Floor division matches the original generator's arithmetic.
            let x = (tw / 2 - ts).div_euclid(2) + QUADRANT_NUDGE_PX;
            let y = th / 2 + (th / 2 - ts).div_euclid(2) + QUADRANT_NUDGE_PX;
            (x, y)
        }
        PlacementMode::FlushBottomLeft => (0, th - ts),
    }
}

/// Build a `size` × `size` alpha mask holding a filled inscribed circle.
///
/// Values are 255 strictly inside the circle, 0 strictly outside, with
/// antialiased coverage along the boundary.
pub fn circular_mask(size: u32) -> Vec<u8> {
    let side = size.max(1);
    let mut pixmap = match Pixmap::new(side, side) {
        Some(p) => p,
        None => return vec![0; (side as usize) * (side as usize)],
    };
    pixmap.fill(tiny_skia::Color::from_rgba8(0, 0, 0, 0));

    let oval = tiny_skia::Rect::from_xywh(0.0, 0.0, side as f32, side as f32);
    let path = oval.and_then(PathBuilder::from_oval);
    if let Some(path) = path {
        let mut paint = Paint::default();
        paint.set_color_rgba8(255, 255, 255, 255);
        paint.anti_alias = true;
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    pixmap.data().chunks_exact(4).map(|px| px[3]).collect()
}

/// Composite a square subject onto a fresh copy of the template.
///
/// The subject is resized to the profile's target diameter with Lanczos
/// resampling, masked to an inscribed circle, and stencil-pasted at the
/// profile's placement: where the mask is opaque the template pixel is
/// replaced, where it is transparent the template pixel is untouched, and
/// boundary pixels blend by mask coverage only.
pub fn compose(
    subject: &DynamicImage,
    template: &DynamicImage,
    profile: &CompositionProfile,
) -> Result<RgbaImage, CardError> {
    let (sw, sh) = subject.dimensions();
    if sw != sh {
        return Err(CardError::NonSquareInput {
            width: sw,
            height: sh,
        });
    }

    let (tw, th) = template.dimensions();
    let target = target_size(tw, profile.target_fraction);
    let (x0, y0) = paste_position(tw, th, target, profile.placement);
    debug!(
        "compositing {target}x{target} subject at ({x0}, {y0}) on {tw}x{th} template"
    );

    let resized = subject
        .resize_exact(target, target, FilterType::Lanczos3)
        .to_rgba8();
    let mask = circular_mask(target);
    let mut canvas = template.to_rgba8();

    for my in 0..target {
        let dy = y0 + i64::from(my);
        if dy < 0 || dy >= i64::from(th) {
            continue;
        }
        for mx in 0..target {
            let alpha = mask[(my as usize) * (target as usize) + mx as usize];
            if alpha == 0 {
                continue;
            }
            let dx = x0 + i64::from(mx);
            if dx < 0 || dx >= i64::from(tw) {
                continue;
            }
            let src = *resized.get_pixel(mx, my);
            let dst = canvas.get_pixel_mut(dx as u32, dy as u32);
            if alpha == 255 {
                *dst = src;
            } else {
                let a = u16::from(alpha);
                let inv = 255 - a;
                for c in 0..4 {
                    let blended = (u16::from(src[c]) * a + u16::from(dst[c]) * inv + 127) / 255;
                    dst[c] = blended as u8;
                }
            }
        }
    }

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::CompositionProfile;
    use image::{Rgba, RgbaImage};

    fn solid(width: u32, height: u32, px: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(px)))
    }

    #[test]
    fn target_size_matches_observed_deployments() {
        assert_eq!(target_size(850, 0.8), 340);
        assert_eq!(target_size(850, 1.0), 425);
        assert_eq!(target_size(850, 0.9), 383);
    }

    #[test]
    fn quadrant_centered_offsets_match_original_generator() {
        // 850x850 template, 340 target: x = 42 + 1, y = 425 + 42 + 1.
        assert_eq!(
            paste_position(850, 850, 340, PlacementMode::QuadrantCentered),
            (43, 468)
        );
    }

    #[test]
    fn flush_placement_touches_bottom_left() {
        assert_eq!(
            paste_position(850, 850, 425, PlacementMode::FlushBottomLeft),
            (0, 425)
        );
        assert_eq!(
            paste_position(600, 400, 120, PlacementMode::FlushBottomLeft),
            (0, 280)
        );
    }

    #[test]
    fn paste_position_ignores_content_entirely() {
        // Pure function of dimensions: two calls, same inputs, same result.
        let a = paste_position(850, 850, 383, PlacementMode::QuadrantCentered);
        let b = paste_position(850, 850, 383, PlacementMode::QuadrantCentered);
        assert_eq!(a, b);
        assert_eq!(a, ((425 - 383) / 2 + 1, 425 + (425 - 383) / 2 + 1));
    }

    #[test]
    fn mask_is_opaque_at_center_and_clear_at_corners() {
        let size = 64;
        let mask = circular_mask(size);
        assert_eq!(mask.len(), 64 * 64);
        let at = |x: usize, y: usize| mask[y * 64 + x];
        assert_eq!(at(32, 32), 255);
        assert_eq!(at(0, 0), 0);
        assert_eq!(at(63, 0), 0);
        assert_eq!(at(0, 63), 0);
        assert_eq!(at(63, 63), 0);
        // Edge midpoints sit on the circle boundary; coverage must be non-zero.
        assert!(at(32, 1) > 0);
    }

    #[test]
    fn composite_has_template_dimensions() {
        let template = solid(850, 850, [10, 20, 30, 255]);
        let subject = solid(500, 500, [200, 50, 50, 255]);
        let out = compose(&subject, &template, &CompositionProfile::strict()).expect("compose");
        assert_eq!(out.width(), 850);
        assert_eq!(out.height(), 850);
    }

    #[test]
    fn outside_circle_retains_template_pixels() {
        let template = solid(200, 200, [10, 20, 30, 255]);
        let subject = solid(80, 80, [250, 240, 230, 255]);
        let mut profile = CompositionProfile::flush();
        profile.target_fraction = 1.0; // target 100, pasted at (0, 100)
        let out = compose(&subject, &template, &profile).expect("compose");

        // Corner of the pasted square, strictly outside the inscribed circle.
        assert_eq!(out.get_pixel(1, 101).0, [10, 20, 30, 255]);
        assert_eq!(out.get_pixel(98, 198).0, [10, 20, 30, 255]);
        // Untouched quadrants.
        assert_eq!(out.get_pixel(150, 50).0, [10, 20, 30, 255]);
    }

    #[test]
    fn inside_circle_shows_subject_pixels() {
        let template = solid(200, 200, [10, 20, 30, 255]);
        let subject = solid(80, 80, [250, 240, 230, 255]);
        let out = compose(&subject, &template, &CompositionProfile::flush()).expect("compose");
        // Circle center for target 100 pasted at (0, 100) is (50, 150).
        assert_eq!(out.get_pixel(50, 150).0, [250, 240, 230, 255]);
    }

    #[test]
    fn non_square_subject_is_rejected() {
        let template = solid(200, 200, [0, 0, 0, 255]);
        let subject = solid(90, 60, [255, 255, 255, 255]);
        let err = compose(&subject, &template, &CompositionProfile::strict()).unwrap_err();
        assert!(matches!(
            err,
            CardError::NonSquareInput {
                width: 90,
                height: 60
            }
        ));
    }

    #[test]
    fn two_subjects_land_at_identical_offsets() {
        let template = solid(850, 850, [5, 5, 5, 255]);
        let light = solid(400, 400, [240, 240, 240, 255]);
        let dark = solid(120, 120, [20, 20, 20, 255]);
        let profile = CompositionProfile::strict();
        let a = compose(&light, &template, &profile).expect("compose");
        let b = compose(&dark, &template, &profile).expect("compose");

        // Subject center for target 340 at (43, 468) is (213, 638).
        assert_eq!(a.get_pixel(213, 638).0, [240, 240, 240, 255]);
        assert_eq!(b.get_pixel(213, 638).0, [20, 20, 20, 255]);
        // The pixel just left of the pasted square is template in both.
        assert_eq!(a.get_pixel(42, 638).0, [5, 5, 5, 255]);
        assert_eq!(b.get_pixel(42, 638).0, [5, 5, 5, 255]);
    }
}
