//! Core math and warp engine for `rswarp`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec2`) and parabolic interpolation,
//! - the six-anchor rolling-shutter motion model ([`FrameMotion`]),
//! - the two-phase distortion engine ([`RollingShutterParams`] →
//!   [`RollingShutterWarp`]),
//! - the numeric inversion solver (`invert`, [`ForwardWarp`]).
//!
//! Warp pipeline:
//! `warped = unit ∘ (ndc + offset(ndc)) ∘ ndc(p)`
//!
//! where `offset` is a separable biquadratic field pinned to the six anchor
//! offsets and to zero on the vertical center line. The forward map has no
//! closed-form inverse; `remove_warp` solves it numerically with a damped
//! Newton iteration over finite-difference Jacobians.

/// Linear algebra type aliases, parabolic fits and coordinate helpers.
pub mod math;
/// Anchor positions and per-anchor frame motion.
pub mod motion;
/// Forward warp engine and parameter types.
pub mod warp;
/// Numeric inversion of a forward warp.
pub mod invert;

pub use invert::*;
pub use math::*;
pub use motion::*;
pub use warp::*;
