//! Quadratic interpolation through three equally spaced samples.
//!
//! The warp field is assembled from one-dimensional parabolas fitted through
//! samples at parameter positions -1, 0 and +1. This is the smallest
//! polynomial that reproduces all three samples, and evaluating it away from
//! the sample positions extrapolates the first-order motion model smoothly.

use super::Real;

/// Parabola `f(t) = c0 + c1*t + c2*t^2` fitted through `f(-1)`, `f(0)`, `f(1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParabolicFit {
    c0: Real,
    c1: Real,
    c2: Real,
}

impl ParabolicFit {
    /// Fit through three samples at t = -1, 0, +1.
    pub fn through(f_neg: Real, f_zero: Real, f_pos: Real) -> Self {
        Self {
            c0: f_zero,
            c1: (f_pos - f_neg) / 2.0,
            c2: (f_neg + f_pos) / 2.0 - f_zero,
        }
    }

    /// Evaluate the parabola at an arbitrary parameter value.
    pub fn eval(&self, t: Real) -> Real {
        self.c0 + t * (self.c1 + t * self.c2)
    }
}
