//! Forward and inverse evaluation of the entry-fee curve.

use crate::error::CurveError;
use crate::segment::{CurveSegment, CurveStyle};
use serde::{Deserialize, Serialize};

/// Smallest entry fee a curve can ever produce.
pub const MIN_ENTRY_FEE: u128 = 10;

/// Every entry fee is a multiple of this many raw units.
pub const ENTRY_FEE_DENOMINATION: u128 = 10;

/// Growing curves saturate here instead of overflowing.
pub const MAX_ENTRY_FEE: u128 = 1_000_000_000_000_000_000_000_000_000_000;

/// Upper bound on the number of segments in one curve.
pub const MAX_CURVE_SEGMENTS: usize = 8;

const BPS: u128 = 10_000;

/// An ordered list of pricing segments.
///
/// Segments are consumed left to right by the number of paid joins. The last
/// segment is always open-ended so the price is defined for every join count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeCurve {
    pub segments: Vec<CurveSegment>,
}

impl FeeCurve {
    /// Build a curve, rejecting invalid segment layouts.
    pub fn new(segments: Vec<CurveSegment>) -> Result<Self, CurveError> {
        let curve = Self { segments };
        curve.validate()?;
        Ok(curve)
    }

    /// A curve that never moves the price.
    pub fn flat() -> Self {
        Self {
            segments: vec![CurveSegment::flat()],
        }
    }

    /// Check the structural invariants of the curve.
    pub fn validate(&self) -> Result<(), CurveError> {
        let Some((last, rest)) = self.segments.split_last() else {
            return Err(CurveError::InvalidFeeCurve("curve has no segments"));
        };
        if self.segments.len() > MAX_CURVE_SEGMENTS {
            return Err(CurveError::InvalidFeeCurve("too many segments"));
        }
        if !last.is_open_ended() {
            return Err(CurveError::InvalidFeeCurve(
                "final segment must be open-ended (length 0)",
            ));
        }
        if rest.iter().any(|s| s.is_open_ended()) {
            return Err(CurveError::InvalidFeeCurve(
                "only the final segment may be open-ended",
            ));
        }
        for segment in &self.segments {
            match segment.style {
                CurveStyle::Static if segment.rate_bps != 0 => {
                    return Err(CurveError::InvalidFeeCurve("static segment must have rate 0"));
                }
                CurveStyle::Linear | CurveStyle::Exponential if segment.rate_bps == 0 => {
                    return Err(CurveError::InvalidFeeCurve("dynamic segment needs a rate"));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Price after `paid_joins` paid joins, starting from `base`.
    pub fn price_at(&self, base: u128, paid_joins: u64) -> u128 {
        let mut price = base;
        for (segment, steps) in self.consumed(paid_joins) {
            price = forward(price, &segment, steps);
        }
        normalize_entry_fee(price)
    }

    /// Base fee that makes the price after `paid_joins` joins equal `target`.
    ///
    /// Walks the consumed segments in reverse applying each inverse transform,
    /// rounding up, then settles on the largest base whose forward price does
    /// not exceed `target`. When some base prices exactly at `target`, the
    /// returned one does too.
    pub fn base_for(&self, paid_joins: u64, target: u128) -> u128 {
        let mut estimate = target;
        for (segment, steps) in self.consumed(paid_joins).into_iter().rev() {
            estimate = inverse(estimate, &segment, steps);
        }
        let estimate = estimate.clamp(MIN_ENTRY_FEE, MAX_ENTRY_FEE);

        // Work in denomination units; the forward price is monotone in the base.
        let unit_price = |units: u128| self.price_at(units * ENTRY_FEE_DENOMINATION, paid_joins);
        let mut hi = estimate.div_ceil(ENTRY_FEE_DENOMINATION);
        if unit_price(hi) <= target {
            return hi * ENTRY_FEE_DENOMINATION;
        }
        let mut lo = MIN_ENTRY_FEE / ENTRY_FEE_DENOMINATION;
        if unit_price(lo) > target {
            return MIN_ENTRY_FEE;
        }
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if unit_price(mid) <= target {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo * ENTRY_FEE_DENOMINATION
    }

    /// Segments touched by `paid_joins`, paired with the steps each consumes.
    fn consumed(&self, paid_joins: u64) -> Vec<(CurveSegment, u64)> {
        let mut remaining = paid_joins;
        let mut out = Vec::new();
        for segment in &self.segments {
            if remaining == 0 {
                break;
            }
            let steps = segment.steps_for(remaining);
            out.push((*segment, steps));
            remaining -= steps;
        }
        out
    }
}

impl Default for FeeCurve {
    fn default() -> Self {
        Self::flat()
    }
}

/// `price_at(base, curve, paid_joins)`.
pub fn price_at(base: u128, curve: &FeeCurve, paid_joins: u64) -> u128 {
    curve.price_at(base, paid_joins)
}

/// `base_for(curve, paid_joins, target)`.
pub fn base_for(curve: &FeeCurve, paid_joins: u64, target: u128) -> u128 {
    curve.base_for(paid_joins, target)
}

/// Clamp into `[MIN_ENTRY_FEE, MAX_ENTRY_FEE]` and floor to the denomination.
pub fn normalize_entry_fee(price: u128) -> u128 {
    let clamped = price.clamp(MIN_ENTRY_FEE, MAX_ENTRY_FEE);
    clamped - clamped % ENTRY_FEE_DENOMINATION
}

/// Reject fees a governance action or config may not set directly.
pub fn validate_entry_fee(fee: u128) -> Result<(), CurveError> {
    if fee < MIN_ENTRY_FEE {
        return Err(CurveError::EntryFeeTooSmall {
            fee,
            min: MIN_ENTRY_FEE,
        });
    }
    if fee % ENTRY_FEE_DENOMINATION != 0 || fee > MAX_ENTRY_FEE {
        return Err(CurveError::InvalidEntryFee(fee));
    }
    Ok(())
}

/// `rate^steps / 10_000^(steps-1)` in basis-point fixed point.
///
/// Square-and-multiply; every intermediate product is floored at 1 so a
/// decaying rate never collapses to zero. `None` when the factor overflows.
pub fn pow_bps(rate_bps: u32, steps: u64) -> Option<u128> {
    let mut result = BPS;
    let mut base = rate_bps as u128;
    let mut exp = steps;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_fixed(result, base)?;
        }
        exp >>= 1;
        if exp > 0 {
            base = mul_fixed(base, base)?;
        }
    }
    Some(result)
}

fn mul_fixed(a: u128, b: u128) -> Option<u128> {
    Some((a.checked_mul(b)? / BPS).max(1))
}

fn forward(price: u128, segment: &CurveSegment, steps: u64) -> u128 {
    if steps == 0 {
        return price;
    }
    let scaled = match segment.style {
        CurveStyle::Static => return price,
        CurveStyle::Linear => linear_growth(segment.rate_bps, steps).and_then(|g| price.checked_mul(g)),
        CurveStyle::Exponential => pow_bps(segment.rate_bps, steps).and_then(|f| price.checked_mul(f)),
    };
    match scaled {
        Some(v) => (v / BPS).min(MAX_ENTRY_FEE),
        None => MAX_ENTRY_FEE,
    }
}

fn inverse(price: u128, segment: &CurveSegment, steps: u64) -> u128 {
    if steps == 0 {
        return price;
    }
    let divisor = match segment.style {
        CurveStyle::Static => return price,
        CurveStyle::Linear => linear_growth(segment.rate_bps, steps),
        CurveStyle::Exponential => pow_bps(segment.rate_bps, steps),
    };
    match (divisor, price.checked_mul(BPS)) {
        (Some(d), Some(scaled)) => scaled.div_ceil(d).min(MAX_ENTRY_FEE),
        // The forward factor overflowed, so any base maps to the ceiling.
        (None, _) => 0,
        (Some(d), None) => price.div_ceil(d).saturating_mul(BPS).min(MAX_ENTRY_FEE),
    }
}

fn linear_growth(rate_bps: u32, steps: u64) -> Option<u128> {
    (rate_bps as u128)
        .checked_mul(steps as u128)?
        .checked_add(BPS)
}
