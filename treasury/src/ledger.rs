//! Registry of reward pools, one per asset.

use crate::error::TreasuryError;
use crate::pool::{CreditOutcome, RewardPool};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use templ_types::Asset;

/// Maximum number of distinct reward assets a Templ tracks.
pub const MAX_REWARD_ASSETS: usize = 256;

/// All reward pools of a Templ.
///
/// The primary asset (the access token) is registered on construction and can
/// never be removed. Other assets are appended once, on first credit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardLedger {
    primary: Asset,
    /// Registration order; used for enumeration views.
    registry: Vec<Asset>,
    pools: BTreeMap<Asset, RewardPool>,
}

impl RewardLedger {
    pub fn new(primary: Asset) -> Self {
        let mut pools = BTreeMap::new();
        pools.insert(primary, RewardPool::new());
        Self {
            primary,
            registry: vec![primary],
            pools,
        }
    }

    pub fn primary(&self) -> Asset {
        self.primary
    }

    pub fn assets(&self) -> &[Asset] {
        &self.registry
    }

    pub fn is_registered(&self, asset: &Asset) -> bool {
        self.pools.contains_key(asset)
    }

    /// Register `asset` if unseen. Returns whether it was newly added.
    pub fn register(&mut self, asset: Asset) -> Result<bool, TreasuryError> {
        if self.is_registered(&asset) {
            return Ok(false);
        }
        if self.registry.len() >= MAX_REWARD_ASSETS {
            return Err(TreasuryError::RewardAssetLimitReached(MAX_REWARD_ASSETS));
        }
        self.registry.push(asset);
        self.pools.insert(asset, RewardPool::new());
        Ok(true)
    }

    pub fn pool(&self, asset: &Asset) -> Option<&RewardPool> {
        self.pools.get(asset)
    }

    fn pool_mut(&mut self, asset: &Asset) -> Result<&mut RewardPool, TreasuryError> {
        self.pools
            .get_mut(asset)
            .ok_or(TreasuryError::UnknownRewardAsset(*asset))
    }

    /// Current cumulative counter of `asset` (0 for unknown assets).
    pub fn cumulative(&self, asset: &Asset) -> u128 {
        self.pools
            .get(asset)
            .map_or(0, |p| p.cumulative_per_member)
    }

    pub fn credit(
        &mut self,
        asset: &Asset,
        amount: u128,
        member_count: u64,
    ) -> Result<CreditOutcome, TreasuryError> {
        self.pool_mut(asset)?.credit(amount, member_count)
    }

    pub fn claimable(&self, asset: &Asset, snapshot: u128) -> u128 {
        self.pools.get(asset).map_or(0, |p| p.claimable(snapshot))
    }

    /// Liabilities still owed to members in `asset`.
    pub fn outstanding(&self, asset: &Asset) -> u128 {
        self.pools.get(asset).map_or(0, RewardPool::outstanding)
    }

    pub fn claim(&mut self, asset: &Asset, snapshot: u128) -> Result<(u128, u128), TreasuryError> {
        self.pool_mut(asset)?.claim(snapshot)
    }

    pub fn sweep_remainder(&mut self, asset: &Asset) -> Result<u128, TreasuryError> {
        self.pool_mut(asset)?.sweep_remainder()
    }

    /// Drop a fully settled, non-primary pool from the registry.
    pub fn remove(&mut self, asset: &Asset) -> Result<RewardPool, TreasuryError> {
        if *asset == self.primary {
            return Err(TreasuryError::PrimaryRewardAsset(*asset));
        }
        let outstanding = self
            .pools
            .get(asset)
            .ok_or(TreasuryError::UnknownRewardAsset(*asset))?
            .outstanding();
        if outstanding > 0 {
            return Err(TreasuryError::RewardsNotSettled {
                asset: *asset,
                outstanding,
            });
        }
        self.registry.retain(|a| a != asset);
        self.pools
            .remove(asset)
            .ok_or(TreasuryError::UnknownRewardAsset(*asset))
    }
}
