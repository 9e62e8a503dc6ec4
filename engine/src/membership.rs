//! Member registry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use templ_governance::Electorate;
use templ_types::{Address, Asset, Timestamp};

/// How a member got in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinId {
    /// Installed at deployment.
    Genesis,
    /// The n-th paid join, from 0.
    Paid(u64),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub address: Address,
    pub joined_at: Timestamp,
    pub join_id: JoinId,
    /// Global join order, genesis members included.
    pub join_sequence: u64,
    /// Per-asset cumulative reward counter at join or last claim.
    pub reward_snapshots: BTreeMap<Asset, u128>,
}

impl Member {
    /// Snapshot for `asset`. Missing means the asset was registered after
    /// this member joined, so the member is owed everything since.
    pub fn snapshot(&self, asset: &Asset) -> u128 {
        self.reward_snapshots.get(asset).copied().unwrap_or(0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipLedger {
    members: BTreeMap<Address, Member>,
    next_sequence: u64,
    total_paid_joins: u64,
}

impl MembershipLedger {
    pub fn contains(&self, who: &Address) -> bool {
        self.members.contains_key(who)
    }

    pub fn get(&self, who: &Address) -> Option<&Member> {
        self.members.get(who)
    }

    pub fn count(&self) -> u64 {
        self.members.len() as u64
    }

    pub fn total_paid_joins(&self) -> u64 {
        self.total_paid_joins
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Record a new member. `snapshots` should hold the live cumulative
    /// counter of every registered reward asset.
    pub fn admit(
        &mut self,
        address: Address,
        joined_at: Timestamp,
        paid: bool,
        snapshots: BTreeMap<Asset, u128>,
    ) -> JoinId {
        let join_id = if paid {
            let id = JoinId::Paid(self.total_paid_joins);
            self.total_paid_joins += 1;
            id
        } else {
            JoinId::Genesis
        };
        let member = Member {
            address,
            joined_at,
            join_id,
            join_sequence: self.next_sequence,
            reward_snapshots: snapshots,
        };
        self.next_sequence += 1;
        self.members.insert(address, member);
        join_id
    }

    pub fn set_snapshot(&mut self, who: &Address, asset: Asset, value: u128) {
        if let Some(member) = self.members.get_mut(who) {
            member.reward_snapshots.insert(asset, value);
        }
    }

    /// Forget every member's snapshot for a retired reward asset.
    pub fn clear_snapshots(&mut self, asset: &Asset) {
        for member in self.members.values_mut() {
            member.reward_snapshots.remove(asset);
        }
    }
}

impl Electorate for MembershipLedger {
    fn member_count(&self) -> u64 {
        self.count()
    }

    fn is_member(&self, who: &Address) -> bool {
        self.contains(who)
    }

    fn join_sequence_of(&self, who: &Address) -> Option<u64> {
        self.members.get(who).map(|m| m.join_sequence)
    }

    fn next_join_sequence(&self) -> u64 {
        self.next_sequence
    }
}
