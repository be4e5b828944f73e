//! Numeric inversion of a forward warp.
//!
//! The forward warp has no closed-form inverse, so removing it is a root
//! find: given a target `q`, locate `p` with `apply_warp(p) ≈ q`. The solver
//! is a damped Newton iteration over the two unknowns. Each outer iteration
//! rebuilds the Jacobian from one-sided finite differences (the forward map's
//! derivative is never maintained symbolically), solves the 2x2 linear system
//! for the step that would cancel the error exactly if the map were locally
//! linear, then backtracks the step until the squared error strictly
//! decreases.
//!
//! Failure is a per-point condition, not a crash: where the forward map folds
//! over (a downward-parabola analog with no preimage beyond the extremum) the
//! line search underflows its step scalar and the solver reports
//! [`WarpError::StepUnderflow`].

use crate::math::{Real, Vec2};
use crate::warp::{ForwardWarp, WarpError};

/// Acceptable error when doing numerical inverses.
pub const DEFAULT_TOLERANCE: Real = 1e-7;

/// Maximum number of outer Newton iterations per inversion.
pub const MAX_OUTER_ITERATIONS: usize = 100;

/// Hard cap on line-search halvings within one outer iteration.
///
/// The `step < tolerance` exit already bounds the loop to about
/// log2(1/tolerance) halvings; this counter only guards against
/// floating-point edge cases in that comparison.
const MAX_BACKTRACK_STEPS: usize = 64;

/// A converged inversion: the recovered point and how many outer iterations
/// it took.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inversion {
    /// Point whose forward warp is within tolerance of the target.
    pub point: Vec2,
    /// Outer Newton iterations spent.
    pub iterations: usize,
}

/// Solve `a*u + b*v = e` for (a, b), pivoting on whichever of `u.x`, `v.x`
/// has the larger magnitude to keep the denominator away from zero.
fn solve_step(u: Vec2, v: Vec2, e: Vec2) -> (Real, Real) {
    if u.x.abs() < v.x.abs() {
        let vy_over_vx = v.y / v.x;
        let a = (e.y - e.x * vy_over_vx) / (u.y - u.x * vy_over_vx);
        let b = (e.x - a * u.x) / v.x;
        (a, b)
    } else {
        let uy_over_ux = u.y / u.x;
        let b = (e.y - e.x * uy_over_ux) / (v.y - v.x * uy_over_ux);
        let a = (e.x - b * v.x) / u.x;
        (a, b)
    }
}

/// Numerically invert `warp` at `target` to within `tolerance`.
///
/// On success the *warped* image of the result is within `tolerance` of
/// `target`; input-space accuracy is not guaranteed to match. The returned
/// [`Inversion`] carries the outer iteration count, which shrinks as the
/// tolerance is loosened.
///
/// # Errors
///
/// - [`WarpError::StepUnderflow`]: within one iteration the backtracking step
///   underflowed the tolerance with no improving point. The local linear
///   model is a poor predictor here, typically because the forward map is
///   not injective around the target.
/// - [`WarpError::IterationLimit`]: no convergence within
///   [`MAX_OUTER_ITERATIONS`].
///
/// A failure result from the forward map during the line search is treated
/// as "no improvement" and the step keeps halving; a failure at the current
/// iterate or while probing the Jacobian propagates.
pub fn invert_warp<W: ForwardWarp>(
    warp: &W,
    target: Vec2,
    initial_guess: Vec2,
    tolerance: Real,
) -> Result<Inversion, WarpError> {
    let epsilon = tolerance;
    let epsilon_sqr = epsilon * epsilon;

    let mut guess = initial_guess;
    let mut warped = warp.apply_warp(guess)?;
    let mut error = warped - target;
    let mut sqr_error = error.norm_squared();

    let mut iterations = 0usize;
    while sqr_error > epsilon_sqr {
        // Finite-difference partials of the warped position when moving the
        // guess in pure x or pure y.
        let warped_dx = warp.apply_warp(guess + Vec2::new(epsilon, 0.0))?;
        let u = (warped_dx - warped) / epsilon;
        let warped_dy = warp.apply_warp(guess + Vec2::new(0.0, epsilon))?;
        let v = (warped_dy - warped) / epsilon;

        // Step that would land exactly on the target if the warp were
        // linear in 2D.
        let (a, b) = solve_step(u, v, error);

        let mut step_scalar: Real = 1.0;
        let mut backtracks = 0usize;
        loop {
            let trial = guess - Vec2::new(a, b) * step_scalar;
            step_scalar /= 2.0;

            // A forward-map failure at the trial point counts as "worse".
            if let Ok(trial_warped) = warp.apply_warp(trial) {
                let trial_error = trial_warped - target;
                let trial_sqr = trial_error.norm_squared();
                if trial_sqr < sqr_error {
                    guess = trial;
                    warped = trial_warped;
                    error = trial_error;
                    sqr_error = trial_sqr;
                    break;
                }
            }

            backtracks += 1;
            if step_scalar < epsilon || backtracks >= MAX_BACKTRACK_STEPS {
                // No improvement all the way down to a tiny step: give up.
                return Err(WarpError::StepUnderflow { tolerance });
            }
        }

        iterations += 1;
        if iterations > MAX_OUTER_ITERATIONS {
            return Err(WarpError::IterationLimit {
                iterations: MAX_OUTER_ITERATIONS,
            });
        }
    }

    Ok(Inversion {
        point: guess,
        iterations,
    })
}

/// [`invert_warp`] returning just the recovered point.
pub fn remove_warp<W: ForwardWarp>(
    warp: &W,
    target: Vec2,
    initial_guess: Vec2,
    tolerance: Real,
) -> Result<Vec2, WarpError> {
    invert_warp(warp, target, initial_guess, tolerance).map(|inv| inv.point)
}
