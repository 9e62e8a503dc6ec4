//! Basis-point arithmetic.
//!
//! All percentages in the engine are integers out of [`BPS_DENOMINATOR`].
//! Products are formed in `u128` and floored unless stated otherwise.

/// 100% in basis points.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// `amount * bps / 10_000`, floored. `None` on overflow.
pub fn mul_bps(amount: u128, bps: u32) -> Option<u128> {
    amount
        .checked_mul(bps as u128)
        .map(|v| v / BPS_DENOMINATOR as u128)
}

/// `amount * bps / 10_000`, rounded up. `None` on overflow.
pub fn ceil_mul_bps(amount: u128, bps: u32) -> Option<u128> {
    let product = amount.checked_mul(bps as u128)?;
    Some(product.div_ceil(BPS_DENOMINATOR as u128))
}

/// Whether `bps` is a percentage in `0..=100%`.
pub fn is_valid_bps(bps: u32) -> bool {
    bps <= BPS_DENOMINATOR
}
