//! Governance proposals and their lifecycle.

use crate::action::ProposalAction;
use crate::voting::{Tally, VoteWeights};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use templ_types::{ceil_mul_bps, Address, Timestamp};

/// Where a proposal stands at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Voting window still open.
    Active,
    /// Window closed and the proposal passes; waiting for execution.
    Passed,
    /// Window closed without passing.
    Rejected,
    /// Applied. Terminal.
    Executed,
}

/// Everything that decides the outcome, frozen when the proposal is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalSnapshot {
    pub quorum_bps: u32,
    pub yes_vote_threshold_bps: u32,
    pub post_quorum_voting_period_secs: u64,
    /// Voting weight of the whole electorate at creation.
    pub eligible_weight: u64,
    pub quorum_exempt: bool,
    pub council_only: bool,
    pub council: BTreeSet<Address>,
    /// Members whose join sequence is below this mark may vote.
    pub join_sequence_mark: u64,
}

/// A governance proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: u64,
    pub proposer: Address,
    pub action: ProposalAction,
    pub title: String,
    pub description: String,
    pub created_at: Timestamp,
    /// End of voting. Pulled in once quorum is first reached.
    pub end_time: Timestamp,
    /// Raw votes by voter, `true` = yes. Weighting is applied at tally time.
    pub votes: BTreeMap<Address, bool>,
    pub snapshot: ProposalSnapshot,
    pub quorum_reached_at: Option<Timestamp>,
    pub executed: bool,
}

impl Proposal {
    /// Raw yes/no head counts.
    pub fn vote_counts(&self) -> (u64, u64) {
        let yes = self.votes.values().filter(|v| **v).count() as u64;
        (yes, self.votes.len() as u64 - yes)
    }

    /// Weighted totals under the given live weights.
    pub fn tally(&self, weights: &VoteWeights) -> Tally {
        let mut tally = Tally::default();
        for (voter, support) in &self.votes {
            let weight = weights.weight_of(voter);
            if *support {
                tally.yes = tally.yes.saturating_add(weight);
            } else {
                tally.no = tally.no.saturating_add(weight);
            }
        }
        tally
    }

    /// Weighted votes needed for quorum.
    pub fn quorum_required(&self) -> u64 {
        let needed = ceil_mul_bps(self.snapshot.eligible_weight as u128, self.snapshot.quorum_bps)
            .unwrap_or(u128::MAX);
        u64::try_from(needed).unwrap_or(u64::MAX)
    }

    pub fn has_quorum(&self, weights: &VoteWeights) -> bool {
        self.tally(weights).total() >= self.quorum_required()
    }

    /// Would the proposal pass if voting closed now?
    pub fn passes(&self, weights: &VoteWeights) -> bool {
        if !self.snapshot.quorum_exempt && !self.has_quorum(weights) {
            return false;
        }
        self.tally(weights)
            .meets_threshold(self.snapshot.yes_vote_threshold_bps)
    }

    pub fn is_active(&self, now: Timestamp) -> bool {
        !self.executed && now < self.end_time
    }

    pub fn status(&self, now: Timestamp, weights: &VoteWeights) -> ProposalStatus {
        if self.executed {
            ProposalStatus::Executed
        } else if now < self.end_time {
            ProposalStatus::Active
        } else if self.passes(weights) {
            ProposalStatus::Passed
        } else {
            ProposalStatus::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal(eligible: u64, exempt: bool) -> Proposal {
        Proposal {
            id: 0,
            proposer: Address::from_low_u64(1),
            action: ProposalAction::SetJoinPaused { paused: true },
            title: String::new(),
            description: String::new(),
            created_at: Timestamp::new(0),
            end_time: Timestamp::new(100),
            votes: BTreeMap::new(),
            snapshot: ProposalSnapshot {
                quorum_bps: 3_300,
                yes_vote_threshold_bps: 5_100,
                post_quorum_voting_period_secs: 10,
                eligible_weight: eligible,
                quorum_exempt: exempt,
                council_only: false,
                council: BTreeSet::new(),
                join_sequence_mark: eligible,
            },
            quorum_reached_at: None,
            executed: false,
        }
    }

    #[test]
    fn test_quorum_is_rounded_up() {
        assert_eq!(proposal(10, false).quorum_required(), 4);
        assert_eq!(proposal(3, false).quorum_required(), 1);
        assert_eq!(proposal(100, false).quorum_required(), 33);
    }

    #[test]
    fn test_status_transitions() {
        let weights = VoteWeights::uniform(Address::from_low_u64(1));
        let mut p = proposal(3, false);
        assert_eq!(p.status(Timestamp::new(50), &weights), ProposalStatus::Active);
        assert_eq!(p.status(Timestamp::new(100), &weights), ProposalStatus::Rejected);
        p.votes.insert(Address::from_low_u64(1), true);
        assert_eq!(p.status(Timestamp::new(100), &weights), ProposalStatus::Passed);
        p.executed = true;
        assert_eq!(p.status(Timestamp::new(100), &weights), ProposalStatus::Executed);
        assert!(!p.is_active(Timestamp::new(0)));
    }

    #[test]
    fn test_exempt_passes_without_votes() {
        let weights = VoteWeights::uniform(Address::from_low_u64(1));
        assert!(proposal(50, true).passes(&weights));
        assert!(!proposal(50, false).passes(&weights));
    }

    #[test]
    fn test_priest_weight_counts_in_tally() {
        let priest = Address::from_low_u64(1);
        let mut p = proposal(10, false);
        p.votes.insert(priest, true);
        p.votes.insert(Address::from_low_u64(2), false);
        p.votes.insert(Address::from_low_u64(3), false);
        assert_eq!(p.vote_counts(), (1, 2));
        assert!(!p.passes(&VoteWeights::uniform(priest)));
        let heavy = VoteWeights::new(priest, 3, 100, 10);
        assert_eq!(p.tally(&heavy), Tally { yes: 3, no: 2 });
        assert!(p.passes(&heavy));
    }
}
