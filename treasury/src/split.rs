//! Entry-fee splitting.

use crate::error::TreasuryError;
use serde::{Deserialize, Serialize};
use templ_types::{mul_bps, BPS_DENOMINATOR};

/// Basis-point split of every entry fee. Must total 10_000.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    pub burn_bps: u32,
    pub treasury_bps: u32,
    pub member_pool_bps: u32,
    pub protocol_bps: u32,
}

/// How one fee was divided.
///
/// `member_pool` is the gross pool slice; `referral` is carved out of it, so
/// only `pooled()` reaches the reward pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub fee: u128,
    pub burn: u128,
    pub treasury: u128,
    pub member_pool: u128,
    pub protocol: u128,
    pub referral: u128,
}

impl FeeSplit {
    pub fn new(
        burn_bps: u32,
        treasury_bps: u32,
        member_pool_bps: u32,
        protocol_bps: u32,
    ) -> Result<Self, TreasuryError> {
        let split = Self {
            burn_bps,
            treasury_bps,
            member_pool_bps,
            protocol_bps,
        };
        split.validate()?;
        Ok(split)
    }

    pub fn total_bps(&self) -> u64 {
        self.burn_bps as u64
            + self.treasury_bps as u64
            + self.member_pool_bps as u64
            + self.protocol_bps as u64
    }

    pub fn validate(&self) -> Result<(), TreasuryError> {
        let total = self.total_bps();
        if total != BPS_DENOMINATOR as u64 {
            return Err(TreasuryError::InvalidPercentageSplit { total });
        }
        Ok(())
    }

    /// Split `fee`. The treasury absorbs the rounding dust of the other buckets.
    ///
    /// `referral_share_bps` is the slice of the member pool paid to a valid
    /// referrer; pass `None` when there is no referrer.
    pub fn apply(
        &self,
        fee: u128,
        referral_share_bps: Option<u32>,
    ) -> Result<FeeBreakdown, TreasuryError> {
        let burn = mul_bps(fee, self.burn_bps).ok_or(TreasuryError::Overflow)?;
        let member_pool = mul_bps(fee, self.member_pool_bps).ok_or(TreasuryError::Overflow)?;
        let protocol = mul_bps(fee, self.protocol_bps).ok_or(TreasuryError::Overflow)?;
        let treasury = fee
            .checked_sub(burn)
            .and_then(|v| v.checked_sub(member_pool))
            .and_then(|v| v.checked_sub(protocol))
            .ok_or(TreasuryError::Overflow)?;
        let referral = match referral_share_bps {
            Some(bps) if bps > 0 => mul_bps(member_pool, bps).ok_or(TreasuryError::Overflow)?,
            _ => 0,
        };
        Ok(FeeBreakdown {
            fee,
            burn,
            treasury,
            member_pool,
            protocol,
            referral,
        })
    }
}

impl Default for FeeSplit {
    fn default() -> Self {
        Self {
            burn_bps: 3_000,
            treasury_bps: 3_000,
            member_pool_bps: 3_000,
            protocol_bps: 1_000,
        }
    }
}

impl FeeBreakdown {
    /// The part of the member-pool slice that enters the reward pool.
    pub fn pooled(&self) -> u128 {
        self.member_pool - self.referral
    }
}
