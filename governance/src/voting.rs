//! Vote weighting and tallies.

use serde::{Deserialize, Serialize};
use templ_types::Address;

/// Live vote weights. Everyone counts once except the priest, who counts
/// `priest_weight` times while the templ is below its weighting threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoteWeights {
    pub priest: Address,
    pub priest_weight: u64,
}

impl VoteWeights {
    pub fn new(priest: Address, configured_weight: u64, threshold: u64, member_count: u64) -> Self {
        let priest_weight = if member_count < threshold {
            configured_weight.max(1)
        } else {
            1
        };
        Self {
            priest,
            priest_weight,
        }
    }

    /// Weights with no priest bonus.
    pub fn uniform(priest: Address) -> Self {
        Self {
            priest,
            priest_weight: 1,
        }
    }

    pub fn weight_of(&self, voter: &Address) -> u64 {
        if *voter == self.priest {
            self.priest_weight
        } else {
            1
        }
    }

    /// Weight the priest carries beyond a regular member.
    pub fn priest_bonus(&self) -> u64 {
        self.priest_weight.saturating_sub(1)
    }
}

/// Weighted yes/no totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub yes: u64,
    pub no: u64,
}

impl Tally {
    pub fn total(&self) -> u64 {
        self.yes.saturating_add(self.no)
    }

    /// `yes * 10000 >= threshold * (yes + no)`. Holds trivially with no votes.
    pub fn meets_threshold(&self, threshold_bps: u32) -> bool {
        let yes = self.yes as u128 * 10_000;
        let needed = threshold_bps as u128 * self.total() as u128;
        yes >= needed
    }
}
