//! Reward claims and treasury movements.

use crate::error::TemplError;
use crate::event::TemplEvent;
use crate::templ::{Templ, Txn};
use templ_host::Host;
use templ_treasury::TreasuryError;
use templ_types::{Address, Asset};

/// Snapshot of the access-token treasury.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreasuryInfo {
    /// Fee income earmarked for the treasury.
    pub treasury_balance: u128,
    /// Access tokens owed to members (unclaimed rewards plus dust).
    pub member_pool_balance: u128,
    /// Access tokens actually held by the templ.
    pub custody: u128,
    /// What a withdrawal or disband could move right now.
    pub available: u128,
    pub total_burned: u128,
    pub total_protocol_fees: u128,
    pub total_referrals: u128,
}

impl Templ {
    /// Pay `member` everything owed to them in `asset`.
    pub fn claim(&mut self, host: &mut dyn Host, member: Address, asset: Asset) -> Result<u128, TemplError> {
        self.transact(host, "claim", |txn| txn.claim(member, asset))
    }

    pub fn treasury_info(&self, host: &dyn Host) -> TreasuryInfo {
        let state = self.state();
        let access = state.access_asset();
        let custody = host.balance_of(&access, &state.address);
        let member_pool_balance = state.rewards.outstanding(&access);
        TreasuryInfo {
            treasury_balance: state.treasury_balance,
            member_pool_balance,
            custody,
            available: custody.saturating_sub(member_pool_balance),
            total_burned: state.stats.total_burned,
            total_protocol_fees: state.stats.total_protocol_fees,
            total_referrals: state.stats.total_referrals,
        }
    }
}

impl Txn<'_> {
    fn claim(&mut self, member: Address, asset: Asset) -> Result<u128, TemplError> {
        let snapshot = self
            .state
            .members
            .get(&member)
            .ok_or(TemplError::NotMember)?
            .snapshot(&asset);
        if !self.state.rewards.is_registered(&asset) {
            return Err(TreasuryError::UnknownRewardAsset(asset).into());
        }
        if self.state.rewards.claimable(&asset, snapshot) == 0 {
            return Err(TemplError::AmountZero);
        }
        let (amount, snapshot) = self.state.rewards.claim(&asset, snapshot)?;
        self.state.members.set_snapshot(&member, asset, snapshot);
        self.pay_out(&asset, &member, amount)?;

        tracing::info!(member = %member, asset = %asset, amount, "rewards claimed");
        self.emit(TemplEvent::RewardClaimed {
            member,
            asset,
            amount,
        });
        Ok(amount)
    }

    pub(crate) fn withdraw(&mut self, asset: Asset, recipient: Address, amount: u128) -> Result<(), TemplError> {
        if recipient.is_zero() {
            return Err(TemplError::InvalidRecipient);
        }
        if amount == 0 {
            return Err(TemplError::AmountZero);
        }
        let available = self.available(&asset);
        if available == 0 {
            return Err(TemplError::NoTreasuryFunds(asset));
        }
        if amount > available {
            return Err(TemplError::InsufficientTreasuryBalance {
                asset,
                available,
                requested: amount,
            });
        }
        if asset == self.state.access_asset() {
            self.state.treasury_balance = self.state.treasury_balance.saturating_sub(amount);
        }
        self.pay_out(&asset, &recipient, amount)?;

        tracing::info!(asset = %asset, recipient = %recipient, amount, "treasury withdrawn");
        self.emit(TemplEvent::TreasuryWithdrawn {
            asset,
            recipient,
            amount,
        });
        Ok(())
    }

    /// Move everything the templ holds in `asset` beyond member liabilities
    /// into that asset's reward pool.
    pub(crate) fn disband(&mut self, asset: Asset) -> Result<(), TemplError> {
        let amount = self.available(&asset);
        if amount == 0 {
            return Err(TemplError::NoTreasuryFunds(asset));
        }
        if self.state.rewards.register(asset)? {
            tracing::info!(asset = %asset, "reward asset registered");
        }
        let members = self.state.members.count();
        let outcome = self.state.rewards.credit(&asset, amount, members)?;
        if asset == self.state.access_asset() {
            self.state.treasury_balance = 0;
        }

        tracing::info!(
            asset = %asset,
            amount,
            per_member = outcome.per_member,
            "treasury disbanded into member pool"
        );
        self.emit(TemplEvent::TreasuryDisbanded {
            asset,
            amount,
            per_member: outcome.per_member,
        });
        Ok(())
    }

    pub(crate) fn sweep_reward_remainder(&mut self, asset: Asset, recipient: Address) -> Result<(), TemplError> {
        if recipient.is_zero() {
            return Err(TemplError::InvalidRecipient);
        }
        let remainder = self.state.rewards.pool(&asset).map_or(0, |p| p.remainder);
        if remainder == 0 {
            return Err(TemplError::AmountZero);
        }
        let amount = self.state.rewards.sweep_remainder(&asset)?;
        self.pay_out(&asset, &recipient, amount)?;

        tracing::info!(asset = %asset, recipient = %recipient, amount, "reward remainder swept");
        self.emit(TemplEvent::RewardRemainderSwept {
            asset,
            recipient,
            amount,
        });
        Ok(())
    }

    pub(crate) fn cleanup_reward_asset(&mut self, asset: Asset) -> Result<(), TemplError> {
        self.state.rewards.remove(&asset)?;
        self.state.members.clear_snapshots(&asset);
        tracing::info!(asset = %asset, "reward asset removed");
        self.emit(TemplEvent::RewardAssetRemoved { asset });
        Ok(())
    }

    /// Every reward pool must still be backed by custody.
    pub(crate) fn ensure_solvent(&self) -> Result<(), TemplError> {
        let templ = self.templ();
        for asset in self.state.rewards.assets() {
            let custody = self.host.balance_of(asset, &templ);
            let owed = self.state.rewards.outstanding(asset);
            if custody < owed {
                return Err(TemplError::InsufficientTreasuryBalance {
                    asset: *asset,
                    available: custody,
                    requested: owed,
                });
            }
        }
        Ok(())
    }
}
