//! Mathematical utilities and type definitions.
//!
//! This module provides the scalar and vector types used throughout the
//! library, the parabolic three-point fit the warp field is built from, and
//! conversions between the unit square and normalized device coordinates.

use nalgebra::Vector2;

pub mod coordinate_utils;
pub mod parabola;

// Re-export for convenience
pub use coordinate_utils::{pixel_to_unit, unit_to_pixel};
pub use parabola::ParabolicFit;

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 2D vector with [`Real`] components.
pub type Vec2 = Vector2<Real>;

/// Convert a coordinate in the unit square [0,1] to NDC [-1,1].
pub fn unit_to_ndc(v: Real) -> Real {
    2.0 * v - 1.0
}

/// Convert a coordinate in NDC [-1,1] to the unit square [0,1].
pub fn ndc_to_unit(v: Real) -> Real {
    (v + 1.0) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_ndc_roundtrip() {
        for v in [0.0, 0.25, 0.5, 1.0, -0.3, 1.7] {
            assert!((ndc_to_unit(unit_to_ndc(v)) - v).abs() < 1e-15);
        }
    }

    #[test]
    fn ndc_endpoints() {
        assert_eq!(unit_to_ndc(0.0), -1.0);
        assert_eq!(unit_to_ndc(0.5), 0.0);
        assert_eq!(unit_to_ndc(1.0), 1.0);
    }
}
