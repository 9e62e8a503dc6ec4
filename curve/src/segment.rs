//! Curve segments.

use serde::{Deserialize, Serialize};

/// How a segment moves the price per paid join.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveStyle {
    /// Price does not move.
    Static,
    /// Price grows by `rate_bps` of the segment's starting price per join.
    Linear,
    /// Price is multiplied by `rate_bps / 10_000` per join (below 10_000 decays).
    Exponential,
}

/// One stretch of the pricing curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurveSegment {
    pub style: CurveStyle,
    /// Rate in basis points; must be 0 for static segments.
    pub rate_bps: u32,
    /// Number of paid joins this segment covers. 0 = open-ended.
    pub length: u64,
}

impl CurveSegment {
    /// The open-ended flat segment.
    pub fn flat() -> Self {
        Self {
            style: CurveStyle::Static,
            rate_bps: 0,
            length: 0,
        }
    }

    pub fn linear(rate_bps: u32, length: u64) -> Self {
        Self {
            style: CurveStyle::Linear,
            rate_bps,
            length,
        }
    }

    pub fn exponential(rate_bps: u32, length: u64) -> Self {
        Self {
            style: CurveStyle::Exponential,
            rate_bps,
            length,
        }
    }

    pub fn is_open_ended(&self) -> bool {
        self.length == 0
    }

    /// Steps this segment consumes out of `remaining` joins.
    pub(crate) fn steps_for(&self, remaining: u64) -> u64 {
        if self.is_open_ended() {
            remaining
        } else {
            remaining.min(self.length)
        }
    }
}
