//! Core governance engine — proposals from creation through execution.

use crate::action::{check_len, ProposalAction, MAX_DESCRIPTION_BYTES, MAX_TITLE_BYTES};
use crate::council::CouncilSet;
use crate::error::GovernanceError;
use crate::index::{ActiveProposalIndex, ProposalPage};
use crate::params::{
    check_post_quorum_period, check_pre_quorum_period, check_quorum_bps,
    check_yes_vote_threshold_bps, GovernanceParams,
};
use crate::proposal::{Proposal, ProposalSnapshot, ProposalStatus};
use crate::voting::VoteWeights;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use templ_types::{Address, Timestamp};

/// The membership view governance needs.
pub trait Electorate {
    fn member_count(&self) -> u64;
    fn is_member(&self, who: &Address) -> bool;
    /// Global join order of a member, genesis members included.
    fn join_sequence_of(&self, who: &Address) -> Option<u64>;
    /// The sequence the next joiner will receive.
    fn next_join_sequence(&self) -> u64;
}

/// A request to open a proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposalRequest {
    pub proposer: Address,
    pub action: ProposalAction,
    pub title: String,
    pub description: String,
}

/// What a vote changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoteOutcome {
    /// The voter's earlier vote, if this one overwrote it.
    pub previous: Option<bool>,
    /// Set when this vote pushed the proposal over quorum for the first time.
    pub quorum_reached: bool,
    pub end_time: Timestamp,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceEngine {
    params: GovernanceParams,
    proposals: BTreeMap<u64, Proposal>,
    next_id: u64,
    index: ActiveProposalIndex,
    council: CouncilSet,
    council_mode: bool,
    dictatorship: bool,
}

impl GovernanceEngine {
    pub fn new(
        params: GovernanceParams,
        council: CouncilSet,
        council_mode: bool,
        dictatorship: bool,
    ) -> Result<Self, GovernanceError> {
        params.validate()?;
        if council_mode && council.is_empty() {
            return Err(GovernanceError::NoCouncilMembers);
        }
        Ok(Self {
            params,
            proposals: BTreeMap::new(),
            next_id: 0,
            index: ActiveProposalIndex::default(),
            council,
            council_mode,
            dictatorship,
        })
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    pub fn council(&self) -> &CouncilSet {
        &self.council
    }

    pub fn council_mode(&self) -> bool {
        self.council_mode
    }

    pub fn dictatorship(&self) -> bool {
        self.dictatorship
    }

    pub fn proposal(&self, id: u64) -> Option<&Proposal> {
        self.proposals.get(&id)
    }

    pub fn proposal_count(&self) -> u64 {
        self.next_id
    }

    pub fn status(&self, id: u64, now: Timestamp, weights: &VoteWeights) -> Option<ProposalStatus> {
        self.proposals.get(&id).map(|p| p.status(now, weights))
    }

    pub fn is_active(&self, id: u64, now: Timestamp) -> bool {
        self.proposals.get(&id).is_some_and(|p| p.is_active(now))
    }

    /// Open a proposal. `templ` is the contract's own address.
    pub fn propose(
        &mut self,
        request: ProposalRequest,
        templ: &Address,
        electorate: &dyn Electorate,
        weights: &VoteWeights,
        now: Timestamp,
    ) -> Result<u64, GovernanceError> {
        let ProposalRequest {
            proposer,
            action,
            title,
            description,
        } = request;

        if !electorate.is_member(&proposer) {
            return Err(GovernanceError::NotMember);
        }
        if self.dictatorship && !action.is_dictatorship_toggle() {
            return Err(GovernanceError::DictatorshipEnabled);
        }
        check_len("title", &title, MAX_TITLE_BYTES)?;
        check_len("description", &description, MAX_DESCRIPTION_BYTES)?;
        action.validate(templ)?;
        if let Some(existing) = self.index.latest_of(&proposer) {
            if self.is_active(existing, now) {
                return Err(GovernanceError::ActiveProposalExists(existing));
            }
        }

        let council_only = self.council_mode;
        let (council, head_count, priest_eligible) = if council_only {
            let council: BTreeSet<Address> = self.council.members().copied().collect();
            let priest_eligible = council.contains(&weights.priest);
            let head_count = council.len() as u64;
            (council, head_count, priest_eligible)
        } else {
            (
                BTreeSet::new(),
                electorate.member_count(),
                electorate.is_member(&weights.priest),
            )
        };
        let eligible_weight = if priest_eligible {
            head_count.saturating_add(weights.priest_bonus())
        } else {
            head_count
        };

        let quorum_exempt = proposer == weights.priest && action.is_emergency();
        let id = self.next_id;
        let mut proposal = Proposal {
            id,
            proposer,
            action,
            title,
            description,
            created_at: now,
            end_time: now.plus_secs(self.params.pre_quorum_voting_period_secs),
            votes: BTreeMap::new(),
            snapshot: ProposalSnapshot {
                quorum_bps: self.params.quorum_bps,
                yes_vote_threshold_bps: self.params.yes_vote_threshold_bps,
                post_quorum_voting_period_secs: self.params.post_quorum_voting_period_secs,
                eligible_weight,
                quorum_exempt,
                council_only,
                council,
                join_sequence_mark: electorate.next_join_sequence(),
            },
            quorum_reached_at: None,
            executed: false,
        };
        if !council_only {
            proposal.votes.insert(proposer, true);
            mark_quorum(&mut proposal, weights, now);
        }

        tracing::info!(
            id,
            proposer = %proposer,
            action = proposal.action.kind(),
            end_time = proposal.end_time.as_secs(),
            quorum_exempt,
            "proposal created"
        );

        self.next_id += 1;
        self.index.insert(id, proposer);
        self.proposals.insert(id, proposal);
        Ok(id)
    }

    /// Record or overwrite a vote.
    pub fn vote(
        &mut self,
        id: u64,
        voter: Address,
        support: bool,
        electorate: &dyn Electorate,
        weights: &VoteWeights,
        now: Timestamp,
    ) -> Result<VoteOutcome, GovernanceError> {
        let dictatorship = self.dictatorship;
        let proposal = self
            .proposals
            .get_mut(&id)
            .filter(|p| !p.executed)
            .ok_or(GovernanceError::InvalidProposal(id))?;
        if dictatorship && !proposal.action.is_dictatorship_toggle() {
            return Err(GovernanceError::DictatorshipEnabled);
        }
        if now >= proposal.end_time {
            return Err(GovernanceError::VotingEnded);
        }
        if !electorate.is_member(&voter) {
            return Err(GovernanceError::NotMember);
        }
        if proposal.snapshot.council_only && !proposal.snapshot.council.contains(&voter) {
            return Err(GovernanceError::NotCouncil);
        }
        match electorate.join_sequence_of(&voter) {
            Some(seq) if seq < proposal.snapshot.join_sequence_mark => {}
            _ => return Err(GovernanceError::JoinedAfterProposal),
        }

        let previous = proposal.votes.insert(voter, support);
        let quorum_reached = mark_quorum(proposal, weights, now);

        tracing::debug!(id, voter = %voter, support, quorum_reached, "vote recorded");

        Ok(VoteOutcome {
            previous,
            quorum_reached,
            end_time: proposal.end_time,
        })
    }

    /// Check a proposal can run and mark it executed. The caller applies the
    /// returned action; on failure the whole engine state must be discarded.
    pub fn begin_execution(
        &mut self,
        id: u64,
        weights: &VoteWeights,
        now: Timestamp,
    ) -> Result<ProposalAction, GovernanceError> {
        let dictatorship = self.dictatorship;
        let proposal = self
            .proposals
            .get_mut(&id)
            .filter(|p| !p.executed)
            .ok_or(GovernanceError::InvalidProposal(id))?;
        if dictatorship && !proposal.action.is_dictatorship_toggle() {
            return Err(GovernanceError::DictatorshipEnabled);
        }
        if now < proposal.end_time {
            return Err(GovernanceError::VotingNotEnded {
                end_time: proposal.end_time.as_secs(),
            });
        }
        if !proposal.passes(weights) {
            return Err(GovernanceError::ProposalNotPassed(id));
        }
        proposal.executed = true;
        let action = proposal.action.clone();
        self.index.remove(id);
        Ok(action)
    }

    /// Remove up to `max` ended, unexecuted proposals from the active index.
    pub fn prune_inactive(&mut self, max: usize, now: Timestamp) -> usize {
        let proposals = &self.proposals;
        let removed = self
            .index
            .prune(max, |id| proposals.get(&id).is_some_and(|p| p.is_active(now)));
        if removed > 0 {
            tracing::debug!(removed, remaining = self.index.len(), "pruned inactive proposals");
        }
        removed
    }

    pub fn active_page(
        &self,
        offset: usize,
        limit: usize,
        now: Timestamp,
    ) -> Result<ProposalPage, GovernanceError> {
        self.index
            .page(offset, limit, |id| self.is_active(id, now))
    }

    pub fn set_quorum_bps(&mut self, bps: u32) -> Result<(), GovernanceError> {
        check_quorum_bps(bps)?;
        self.params.quorum_bps = bps;
        Ok(())
    }

    pub fn set_yes_vote_threshold_bps(&mut self, bps: u32) -> Result<(), GovernanceError> {
        check_yes_vote_threshold_bps(bps)?;
        self.params.yes_vote_threshold_bps = bps;
        Ok(())
    }

    pub fn set_pre_quorum_voting_period(&mut self, secs: u64) -> Result<(), GovernanceError> {
        check_pre_quorum_period(secs)?;
        self.params.pre_quorum_voting_period_secs = secs;
        Ok(())
    }

    pub fn set_post_quorum_voting_period(&mut self, secs: u64) -> Result<(), GovernanceError> {
        check_post_quorum_period(secs)?;
        self.params.post_quorum_voting_period_secs = secs;
        Ok(())
    }

    pub fn set_dictatorship(&mut self, enabled: bool) {
        self.dictatorship = enabled;
    }

    pub fn set_council_mode(&mut self, enabled: bool) -> Result<(), GovernanceError> {
        if enabled && self.council.is_empty() {
            return Err(GovernanceError::NoCouncilMembers);
        }
        self.council_mode = enabled;
        Ok(())
    }

    pub fn add_council_member(&mut self, member: Address) -> Result<(), GovernanceError> {
        self.council.add(member)
    }

    pub fn remove_council_member(&mut self, member: &Address) -> Result<(), GovernanceError> {
        self.council.remove(member, self.council_mode)
    }

    pub fn bootstrap_council_seat(&mut self, member: Address) -> Result<(), GovernanceError> {
        self.council.bootstrap(member)
    }
}

/// Record the first time quorum is reached and pull in the deadline.
fn mark_quorum(proposal: &mut Proposal, weights: &VoteWeights, now: Timestamp) -> bool {
    if proposal.snapshot.quorum_exempt
        || proposal.quorum_reached_at.is_some()
        || !proposal.has_quorum(weights)
    {
        return false;
    }
    proposal.quorum_reached_at = Some(now);
    let shortened = now.plus_secs(proposal.snapshot.post_quorum_voting_period_secs);
    if shortened < proposal.end_time {
        proposal.end_time = shortened;
    }
    true
}
