//! Rolling-shutter distortion engine.
//!
//! The engine is split in two phases. [`RollingShutterParams`] is the mutable,
//! serializable parameter set a host edits: the rolling-shutter ratio, the
//! (currently inert) anchor depths and the six-anchor frame motion. Calling
//! [`RollingShutterParams::compile`] bakes those into an immutable
//! [`RollingShutterWarp`] holding the precomputed per-anchor warp offsets;
//! only the compiled value can warp points, so a stale-precompute bug cannot
//! be expressed. Warp calls take `&self` and the compiled value is `Send +
//! Sync`, so a frame driver may fan warp calls out across threads freely.
//!
//! The forward warp is a separable biquadratic offset field: two horizontal
//! parabolas through the top and bottom anchor offsets, combined by a
//! vertical parabola whose middle control value is pinned to zero. It exactly
//! reproduces the six anchor offsets and leaves the vertical center line of
//! the frame untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::invert::{self, DEFAULT_TOLERANCE};
use crate::math::{ndc_to_unit, unit_to_ndc, ParabolicFit, Real, Vec2};
use crate::motion::{anchor_position, AnchorColumn, AnchorMotion, AnchorRow, FrameMotion};

/// Depth assigned to anchors that are effectively at infinity.
///
/// The depth fields are carried for a planned depth-based perspective
/// extension and do not participate in the current warp math.
pub const FAR_AWAY_DEPTH: Real = 1e10;

/// Failure signal of the warp engine.
///
/// Only inversion can currently fail; the two variants record why the solver
/// gave up, as informational detail. Callers are expected to treat both the
/// same way: the point cannot be mapped, substitute a sentinel and move on.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum WarpError {
    /// The line search halved its step below the numeric tolerance without
    /// finding any improvement, which happens where the forward map is not
    /// locally invertible (a fold or extremum of the warp field).
    #[error("cannot invert warp: step scalar fell below {tolerance:e} with no improvement")]
    StepUnderflow {
        /// Numeric tolerance the inversion was running at.
        tolerance: Real,
    },
    /// The solver did not reach the requested tolerance within its iteration
    /// budget.
    #[error("cannot invert warp: no convergence after {iterations} iterations")]
    IterationLimit {
        /// The exhausted iteration budget.
        iterations: usize,
    },
}

/// Forward warp map from undistorted to distorted unit-space positions.
///
/// This is the seam the numeric inversion operates through: anything that can
/// warp a point forward can be inverted by [`invert::invert_warp`]. The
/// current rolling-shutter model never fails, but the signature reserves the
/// failure signal for forward models that can leave the representable range.
pub trait ForwardWarp {
    /// Warp a point given in [0,1] unit space; the result is in the same
    /// space.
    fn apply_warp(&self, p: Vec2) -> Result<Vec2, WarpError>;
}

/// User-editable rolling-shutter distortion parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingShutterParams {
    /// Temporal exposure offset between the top and bottom scanlines.
    ///
    /// 0 means the whole frame was exposed at once (identity warp); positive
    /// values move the top of the frame toward its next-frame motion and the
    /// bottom toward its previous-frame motion. Conventionally in [-1, 1],
    /// unenforced.
    pub ratio: Real,
    /// Depth of the top anchors. Carried, not used by the warp math.
    pub top_depth: Real,
    /// Depth of the bottom anchors. Carried, not used by the warp math.
    pub bottom_depth: Real,
    /// Motion of the six anchors on this frame.
    pub motion: FrameMotion,
}

impl Default for RollingShutterParams {
    fn default() -> Self {
        Self {
            ratio: 0.0,
            top_depth: FAR_AWAY_DEPTH,
            bottom_depth: FAR_AWAY_DEPTH,
            motion: FrameMotion::stationary(),
        }
    }
}

impl RollingShutterParams {
    /// Set previous/next positions of a top-row anchor.
    pub fn set_top_motion(&mut self, col: AnchorColumn, previous: Vec2, next: Vec2) {
        self.motion.top[col.index()] = AnchorMotion::new(previous, next);
    }

    /// Set previous/next positions of a bottom-row anchor.
    pub fn set_bottom_motion(&mut self, col: AnchorColumn, previous: Vec2, next: Vec2) {
        self.motion.bottom[col.index()] = AnchorMotion::new(previous, next);
    }

    /// Bake the parameters into an immutable warp.
    ///
    /// For each top anchor the motion is interpolated at `+ratio`, for each
    /// bottom anchor at `-ratio`; subtracting the nominal anchor position
    /// turns the interpolated positions into warp offsets. The sign asymmetry
    /// is the rolling-shutter model: one exposure brackets the top of the
    /// frame toward the next frame and the bottom toward the previous one.
    pub fn compile(&self) -> RollingShutterWarp {
        let mut top_offset = [Vec2::zeros(); 3];
        let mut bottom_offset = [Vec2::zeros(); 3];

        for col in AnchorColumn::ALL {
            let i = col.index();

            let top_nominal = anchor_position(AnchorRow::Top, col);
            top_offset[i] = self.motion.top[i].interpolate(self.ratio, top_nominal) - top_nominal;

            let bottom_nominal = anchor_position(AnchorRow::Bottom, col);
            bottom_offset[i] =
                self.motion.bottom[i].interpolate(-self.ratio, bottom_nominal) - bottom_nominal;
        }

        RollingShutterWarp {
            ratio: self.ratio,
            top_depth: self.top_depth,
            bottom_depth: self.bottom_depth,
            top_offset,
            bottom_offset,
        }
    }
}

/// Compiled rolling-shutter warp for one frame.
///
/// Produced by [`RollingShutterParams::compile`]; immutable. Holds only the
/// precomputed per-anchor offsets the warp math reads, never the raw motion
/// data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingShutterWarp {
    ratio: Real,
    top_depth: Real,
    bottom_depth: Real,
    top_offset: [Vec2; 3],
    bottom_offset: [Vec2; 3],
}

impl RollingShutterWarp {
    /// Rolling-shutter ratio this warp was compiled with.
    pub fn ratio(&self) -> Real {
        self.ratio
    }

    /// Carried top anchor depth (inert in the current warp math).
    pub fn top_depth(&self) -> Real {
        self.top_depth
    }

    /// Carried bottom anchor depth (inert in the current warp math).
    pub fn bottom_depth(&self) -> Real {
        self.bottom_depth
    }

    /// Precomputed NDC warp offset of a top anchor.
    pub fn top_offset(&self, col: AnchorColumn) -> Vec2 {
        self.top_offset[col.index()]
    }

    /// Precomputed NDC warp offset of a bottom anchor.
    pub fn bottom_offset(&self, col: AnchorColumn) -> Vec2 {
        self.bottom_offset[col.index()]
    }

    /// Whether this warp has any effect at all.
    ///
    /// True exactly when the ratio is within numeric epsilon of zero; hosts
    /// use this to skip warp work for the frame.
    pub fn is_identity(&self) -> bool {
        self.ratio.abs() <= DEFAULT_TOLERANCE
    }

    /// Numerically invert [`ForwardWarp::apply_warp`].
    ///
    /// Finds the point whose forward warp lands on `q`, starting the search
    /// at `q` itself (rolling-shutter displacement is small relative to the
    /// frame, so the target is a good guess). The guarantee on success is
    /// that the *warped* result is within the default tolerance of `q`.
    ///
    /// # Errors
    ///
    /// [`WarpError`] when the forward map is not locally invertible at the
    /// target (fold/extremum region) or the solver exhausts its iteration
    /// budget.
    pub fn remove_warp(&self, q: Vec2) -> Result<Vec2, WarpError> {
        invert::remove_warp(self, q, q, DEFAULT_TOLERANCE)
    }

    /// [`Self::remove_warp`] with an explicit initial guess and tolerance.
    pub fn remove_warp_with(
        &self,
        q: Vec2,
        initial_guess: Vec2,
        tolerance: Real,
    ) -> Result<Vec2, WarpError> {
        invert::remove_warp(self, q, initial_guess, tolerance)
    }
}

impl ForwardWarp for RollingShutterWarp {
    fn apply_warp(&self, p: Vec2) -> Result<Vec2, WarpError> {
        let ndc = Vec2::new(unit_to_ndc(p.x), unit_to_ndc(p.y));

        // Horizontal fits through the three per-anchor offsets, one per axis.
        let top = Vec2::new(
            ParabolicFit::through(self.top_offset[0].x, self.top_offset[1].x, self.top_offset[2].x)
                .eval(ndc.x),
            ParabolicFit::through(self.top_offset[0].y, self.top_offset[1].y, self.top_offset[2].y)
                .eval(ndc.x),
        );
        let bottom = Vec2::new(
            ParabolicFit::through(
                self.bottom_offset[0].x,
                self.bottom_offset[1].x,
                self.bottom_offset[2].x,
            )
            .eval(ndc.x),
            ParabolicFit::through(
                self.bottom_offset[0].y,
                self.bottom_offset[1].y,
                self.bottom_offset[2].y,
            )
            .eval(ndc.x),
        );

        // Vertical fits blend bottom and top rows; the middle control value
        // is fixed at zero so the center scanline never moves.
        let offset = Vec2::new(
            ParabolicFit::through(bottom.x, 0.0, top.x).eval(ndc.y),
            ParabolicFit::through(bottom.y, 0.0, top.y).eval(ndc.y),
        );

        let warped = ndc + offset;
        Ok(Vec2::new(ndc_to_unit(warped.x), ndc_to_unit(warped.y)))
    }
}
