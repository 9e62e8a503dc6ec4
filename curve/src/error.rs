//! Curve-specific errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CurveError {
    #[error("invalid fee curve: {0}")]
    InvalidFeeCurve(&'static str),

    #[error("entry fee {fee} is below the minimum of {min}")]
    EntryFeeTooSmall { fee: u128, min: u128 },

    #[error("entry fee {0} is not a multiple of the fee denomination")]
    InvalidEntryFee(u128),
}
