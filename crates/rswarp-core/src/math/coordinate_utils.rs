//! Coordinate transformation between image pixels and the warp unit space.
//!
//! The warp engine works in a [0,1] unit space whose x axis spans the image
//! width. A host that iterates pixels converts into that space with these
//! helpers before calling the engine, honoring a non-square pixel aspect
//! ratio: x is unsqueezed by the aspect before normalization and the y range
//! is centered so that the unit square's vertical midline coincides with the
//! image center regardless of the frame's aspect.

use super::{Real, Vec2};

/// Convert image pixel coordinates to the engine's [0,1] unit space.
///
/// `pixel_aspect` is the width of a pixel relative to its height (1.0 for
/// square pixels). The resulting x lies in [0,1]; y lies in
/// `[(1 - h/(w*par))/2, h/(w*par) + (1 - h/(w*par))/2]` so the image center
/// maps to (0.5, 0.5).
pub fn pixel_to_unit(pixel: Vec2, width: Real, height: Real, pixel_aspect: Real) -> Vec2 {
    let span = width * pixel_aspect;
    Vec2::new(
        pixel.x * pixel_aspect / span,
        pixel.y / span + (1.0 - height / span) / 2.0,
    )
}

/// Convert a point in the engine's unit space back to image pixels.
///
/// Exact inverse of [`pixel_to_unit`] for the same image geometry.
pub fn unit_to_pixel(unit: Vec2, width: Real, height: Real, pixel_aspect: Real) -> Vec2 {
    let span = width * pixel_aspect;
    Vec2::new(
        unit.x * span / pixel_aspect,
        (unit.y - (1.0 - height / span) / 2.0) * span,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_unit_roundtrip() {
        let p = Vec2::new(123.0, 456.0);
        let u = pixel_to_unit(p, 1920.0, 1080.0, 1.0);
        let back = unit_to_pixel(u, 1920.0, 1080.0, 1.0);
        assert!((back - p).norm() < 1e-10);
    }

    #[test]
    fn image_center_maps_to_unit_center() {
        let u = pixel_to_unit(Vec2::new(960.0, 540.0), 1920.0, 1080.0, 1.0);
        assert!((u.x - 0.5).abs() < 1e-12);
        assert!((u.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn anamorphic_roundtrip() {
        let p = Vec2::new(800.0, 300.0);
        let u = pixel_to_unit(p, 1440.0, 1080.0, 2.0);
        let back = unit_to_pixel(u, 1440.0, 1080.0, 2.0);
        assert!((back - p).norm() < 1e-10);
    }

    #[test]
    fn x_axis_spans_unit_interval() {
        let left = pixel_to_unit(Vec2::new(0.0, 0.0), 1920.0, 1080.0, 1.0);
        let right = pixel_to_unit(Vec2::new(1920.0, 0.0), 1920.0, 1080.0, 1.0);
        assert!(left.x.abs() < 1e-12);
        assert!((right.x - 1.0).abs() < 1e-12);
    }
}
