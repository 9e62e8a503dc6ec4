//! The full mutable state of one Templ.

use crate::config::TemplMetadata;
use crate::membership::MembershipLedger;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use templ_curve::FeeCurve;
use templ_governance::{GovernanceEngine, VoteWeights};
use templ_treasury::{FeeSplit, RewardLedger};
use templ_types::{Address, Asset, Timestamp};

/// Settings governance can change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplSettings {
    pub access_token: Address,
    pub priest: Address,
    pub protocol_fee_recipient: Address,
    pub burn_address: Address,
    /// Anchor of the entry-fee curve.
    pub base_entry_fee: u128,
    pub curve: FeeCurve,
    pub split: FeeSplit,
    /// 0 means unlimited.
    pub max_members: u64,
    pub join_paused: bool,
    pub proposal_fee_bps: u32,
    pub referral_share_bps: u32,
    pub priest_vote_weight: u64,
    pub priest_weight_threshold: u64,
    pub metadata: TemplMetadata,
}

/// Running totals of what left the templ on every join.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplStats {
    pub total_burned: u128,
    pub total_protocol_fees: u128,
    pub total_referrals: u128,
}

/// Everything an operation may change. Operations work on a clone and
/// replace the original only on success.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplState {
    pub address: Address,
    pub created_at: Timestamp,
    pub settings: TemplSettings,
    pub members: MembershipLedger,
    pub rewards: RewardLedger,
    /// Access-token fees earmarked for the treasury.
    pub treasury_balance: u128,
    pub governance: GovernanceEngine,
    pub stats: TemplStats,
}

impl TemplState {
    pub fn access_asset(&self) -> Asset {
        Asset::Token(self.settings.access_token)
    }

    /// Price of the next paid join.
    pub fn current_entry_fee(&self) -> u128 {
        self.settings
            .curve
            .price_at(self.settings.base_entry_fee, self.members.total_paid_joins())
    }

    /// Live vote weights under the current member count.
    pub fn vote_weights(&self) -> VoteWeights {
        VoteWeights::new(
            self.settings.priest,
            self.settings.priest_vote_weight,
            self.settings.priest_weight_threshold,
            self.members.count(),
        )
    }

    /// Live cumulative counters of every registered reward asset; the
    /// starting snapshots of a new member.
    pub fn reward_snapshots(&self) -> BTreeMap<Asset, u128> {
        self.rewards
            .assets()
            .iter()
            .map(|asset| (*asset, self.rewards.cumulative(asset)))
            .collect()
    }

    pub fn member_limit_reached(&self) -> bool {
        self.settings.max_members > 0 && self.members.count() >= self.settings.max_members
    }
}
