//! Rolling-shutter image distortion: forward warp and numeric inverse warp.
//!
//! A rolling-shutter sensor exposes each scanline at a slightly different
//! time, so frame-to-frame motion smears straight geometry. This crate models
//! that smear as a warp field driven by the motion of six anchor points
//! (top/bottom edge at left/middle/right) and a scalar temporal ratio, and
//! can both apply the warp and numerically remove it.
//!
//! ```
//! use rswarp::prelude::*;
//!
//! # fn main() -> Result<(), WarpError> {
//! let mut params = RollingShutterParams {
//!     ratio: 0.5,
//!     ..Default::default()
//! };
//! // Top-middle anchor drifts upward across frames.
//! params.set_top_motion(
//!     AnchorColumn::Middle,
//!     Vec2::new(0.0, 1.0),
//!     Vec2::new(0.0, 1.2),
//! );
//!
//! let warp = params.compile();
//! let distorted = warp.apply_warp(Vec2::new(0.5, 1.0))?;
//! let recovered = warp.remove_warp(distorted)?;
//! assert!((recovered - Vec2::new(0.5, 1.0)).norm() < 1e-6);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - **[`core`]**: math primitives, anchor motion model, warp engine and
//!   inversion solver
//! - **[`prelude`]**: convenient re-exports for common use cases
//!
//! The engine is a pure in-process numeric library: the host owns per-pixel
//! iteration, resampling and the substitution of a sentinel value when a
//! point cannot be inverted.

/// Math primitives, anchor motion model, warp engine and inversion solver.
pub mod core {
    pub use rswarp_core::*;
}

/// Convenient re-exports for common use cases.
///
/// Import with `use rswarp::prelude::*;` to get started quickly.
pub mod prelude {
    pub use crate::core::{
        anchor_position, invert_warp, pixel_to_unit, remove_warp, unit_to_pixel, AnchorColumn,
        AnchorMotion, AnchorRow, ForwardWarp, FrameMotion, Inversion, Real, RollingShutterParams,
        RollingShutterWarp, Vec2, WarpError, DEFAULT_TOLERANCE,
    };
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use approx::assert_relative_eq;

    #[test]
    fn facade_exposes_full_pipeline() {
        let params = RollingShutterParams::default();
        let warp = params.compile();
        assert!(warp.is_identity());

        let pixel = Vec2::new(640.0, 360.0);
        let unit = pixel_to_unit(pixel, 1920.0, 1080.0, 1.0);
        let warped = warp.apply_warp(unit).expect("forward warp never fails");
        let back = unit_to_pixel(warped, 1920.0, 1080.0, 1.0);
        assert_relative_eq!(back.x, pixel.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, pixel.y, epsilon = 1e-9);
    }
}
