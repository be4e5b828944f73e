//! Anchor positions and per-anchor frame motion.
//!
//! The distortion field is defined by six anchors: three on the top edge of
//! the frame and three on the bottom, at NDC x = -1, 0, +1. Each anchor
//! carries the position it had on the previous frame and the position it will
//! have on the next frame; interpolating that motion at a temporal offset is
//! what turns per-frame tracking data into a warp.

use serde::{Deserialize, Serialize};

use crate::math::{ParabolicFit, Real, Vec2};

/// Horizontal anchor row in NDC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorRow {
    /// Top edge of the frame, NDC y = +1.
    Top,
    /// Vertical center, NDC y = 0. Carries no motion; the warp field is
    /// pinned to zero here.
    Middle,
    /// Bottom edge of the frame, NDC y = -1.
    Bottom,
}

/// Column position of an anchor within its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorColumn {
    Left,
    Middle,
    Right,
}

impl AnchorColumn {
    /// All columns, in storage order.
    pub const ALL: [AnchorColumn; 3] = [AnchorColumn::Left, AnchorColumn::Middle, AnchorColumn::Right];

    /// Storage index of this column (left = 0, middle = 1, right = 2).
    pub fn index(self) -> usize {
        match self {
            AnchorColumn::Left => 0,
            AnchorColumn::Middle => 1,
            AnchorColumn::Right => 2,
        }
    }
}

/// Nominal (undistorted) NDC position of an anchor.
///
/// These are fixed constants, never mutated: x in {-1, 0, +1} by column,
/// y in {+1, 0, -1} by row.
pub fn anchor_position(row: AnchorRow, col: AnchorColumn) -> Vec2 {
    let x = match col {
        AnchorColumn::Left => -1.0,
        AnchorColumn::Middle => 0.0,
        AnchorColumn::Right => 1.0,
    };
    let y = match row {
        AnchorRow::Top => 1.0,
        AnchorRow::Middle => 0.0,
        AnchorRow::Bottom => -1.0,
    };
    Vec2::new(x, y)
}

/// Motion of a single anchor across the adjacent frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorMotion {
    /// Position of this anchor on the previous frame.
    pub previous: Vec2,
    /// Position of this anchor on the next frame.
    pub next: Vec2,
}

impl AnchorMotion {
    /// Motion between explicit previous and next positions.
    pub fn new(previous: Vec2, next: Vec2) -> Self {
        Self { previous, next }
    }

    /// An anchor that does not move: previous and next equal `position`.
    pub fn stationary(position: Vec2) -> Self {
        Self {
            previous: position,
            next: position,
        }
    }

    /// Interpolate the anchor position at temporal offset `t`, where
    /// f(-1) is `previous`, f(0) is `current` and f(+1) is `next`.
    ///
    /// Each axis is fitted independently with a parabola through the three
    /// samples, so the motion model is first-order in velocity with a
    /// constant acceleration term.
    pub fn interpolate(&self, t: Real, current: Vec2) -> Vec2 {
        let x = ParabolicFit::through(self.previous.x, current.x, self.next.x);
        let y = ParabolicFit::through(self.previous.y, current.y, self.next.y);
        Vec2::new(x.eval(t), y.eval(t))
    }
}

/// Motion of all six anchors on a single frame.
///
/// Always exactly three top and three bottom entries, indexed by
/// [`AnchorColumn`] storage order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameMotion {
    /// Top-row anchor motion (left, middle, right).
    pub top: [AnchorMotion; 3],
    /// Bottom-row anchor motion (left, middle, right).
    pub bottom: [AnchorMotion; 3],
}

impl FrameMotion {
    /// Motion in which every anchor stays at its nominal position.
    pub fn stationary() -> Self {
        let at = |row, col| AnchorMotion::stationary(anchor_position(row, col));
        Self {
            top: AnchorColumn::ALL.map(|c| at(AnchorRow::Top, c)),
            bottom: AnchorColumn::ALL.map(|c| at(AnchorRow::Bottom, c)),
        }
    }
}

impl Default for FrameMotion {
    fn default() -> Self {
        Self::stationary()
    }
}
