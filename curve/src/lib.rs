//! Entry-fee pricing for Templ membership.
//!
//! The price of the next join is a deterministic function of a base fee, an
//! ordered list of curve segments and the number of paid joins so far:
//!
//! `price(n) = clamp(floor10(apply(segments, base, n)))`
//!
//! This crate handles:
//! - Forward evaluation (price after `n` paid joins)
//! - Inverse evaluation (re-anchoring the base so a target price holds at `n`)
//! - Curve and entry-fee validation

pub mod curve;
pub mod error;
pub mod segment;

pub use curve::{
    base_for, normalize_entry_fee, pow_bps, price_at, validate_entry_fee, FeeCurve,
    ENTRY_FEE_DENOMINATION, MAX_CURVE_SEGMENTS, MAX_ENTRY_FEE, MIN_ENTRY_FEE,
};
pub use error::CurveError;
pub use segment::{CurveSegment, CurveStyle};
