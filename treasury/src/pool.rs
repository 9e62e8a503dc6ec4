//! Remainder-carrying reward pool for one asset.

use crate::error::TreasuryError;
use serde::{Deserialize, Serialize};

/// Per-asset reward pool.
///
/// Members hold a snapshot of `cumulative_per_member`; what they can claim is
/// the difference to the live counter. Division dust is kept in `remainder`
/// and rolled into the next credit, never handed out early.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPool {
    /// Running total each member has been entitled to since the pool opened.
    pub cumulative_per_member: u128,
    /// Dust carried into the next credit. Always below the member count of the
    /// credit that produced it.
    pub remainder: u128,
    pub total_credited: u128,
    pub total_claimed: u128,
}

/// Result of a single credit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreditOutcome {
    pub per_member: u128,
    pub remainder: u128,
}

impl RewardPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` across `member_count` members.
    ///
    /// `(amount + remainder) / member_count` is added to the cumulative counter
    /// and `(amount + remainder) % member_count` becomes the new remainder.
    pub fn credit(&mut self, amount: u128, member_count: u64) -> Result<CreditOutcome, TreasuryError> {
        if member_count == 0 {
            return Err(TreasuryError::NoMembers);
        }
        let total = amount
            .checked_add(self.remainder)
            .ok_or(TreasuryError::Overflow)?;
        let count = member_count as u128;
        let per_member = total / count;
        let remainder = total % count;
        let cumulative = self
            .cumulative_per_member
            .checked_add(per_member)
            .ok_or(TreasuryError::Overflow)?;
        let credited = self
            .total_credited
            .checked_add(amount)
            .ok_or(TreasuryError::Overflow)?;
        self.cumulative_per_member = cumulative;
        self.total_credited = credited;
        self.remainder = remainder;
        Ok(CreditOutcome {
            per_member,
            remainder,
        })
    }

    /// Amount a member with `snapshot` can claim.
    pub fn claimable(&self, snapshot: u128) -> u128 {
        self.cumulative_per_member.saturating_sub(snapshot)
    }

    /// Liabilities still held for members (unclaimed entitlements + dust).
    pub fn outstanding(&self) -> u128 {
        self.total_credited - self.total_claimed
    }

    /// Record a claim by a member holding `snapshot`; returns the amount due
    /// and the snapshot to store.
    pub fn claim(&mut self, snapshot: u128) -> Result<(u128, u128), TreasuryError> {
        let amount = self.claimable(snapshot);
        if amount == 0 {
            return Err(TreasuryError::AmountZero);
        }
        self.total_claimed = self
            .total_claimed
            .checked_add(amount)
            .ok_or(TreasuryError::Overflow)?;
        Ok((amount, self.cumulative_per_member))
    }

    /// Take the carried dust out of the pool.
    pub fn sweep_remainder(&mut self) -> Result<u128, TreasuryError> {
        let amount = self.remainder;
        if amount == 0 {
            return Err(TreasuryError::AmountZero);
        }
        self.remainder = 0;
        self.total_claimed = self
            .total_claimed
            .checked_add(amount)
            .ok_or(TreasuryError::Overflow)?;
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seven_across_three() {
        let mut pool = RewardPool::new();
        let out = pool.credit(7, 3).unwrap();
        assert_eq!(out, CreditOutcome { per_member: 2, remainder: 1 });
        assert_eq!(pool.claimable(0), 2);
        assert_eq!(pool.outstanding(), 7);
    }

    #[test]
    fn test_remainder_rolls_into_next_credit() {
        let mut pool = RewardPool::new();
        pool.credit(7, 3).unwrap();
        // a fourth member joins at cumulative 2
        let late_snapshot = pool.cumulative_per_member;
        let out = pool.credit(3, 4).unwrap();
        assert_eq!(out, CreditOutcome { per_member: 1, remainder: 0 });
        assert_eq!(pool.claimable(0), 3);
        assert_eq!(pool.claimable(late_snapshot), 1);
        // 3 * 3 + 1 == 10 credited
        assert_eq!(pool.outstanding(), 10);
    }

    #[test]
    fn test_claim_advances_snapshot() {
        let mut pool = RewardPool::new();
        pool.credit(9, 3).unwrap();
        let (amount, snapshot) = pool.claim(0).unwrap();
        assert_eq!((amount, snapshot), (3, 3));
        assert_eq!(pool.claim(snapshot), Err(TreasuryError::AmountZero));
        assert_eq!(pool.outstanding(), 6);
    }

    #[test]
    fn test_sweep_remainder_only_when_dust_exists() {
        let mut pool = RewardPool::new();
        pool.credit(9, 3).unwrap();
        assert_eq!(pool.sweep_remainder(), Err(TreasuryError::AmountZero));
        pool.credit(2, 3).unwrap();
        assert_eq!(pool.sweep_remainder(), Ok(2));
        assert_eq!(pool.remainder, 0);
        assert_eq!(pool.outstanding(), 9);
    }

    #[test]
    fn test_credit_without_members_fails() {
        let mut pool = RewardPool::new();
        assert_eq!(pool.credit(5, 0), Err(TreasuryError::NoMembers));
        assert_eq!(pool, RewardPool::new());
    }
}
