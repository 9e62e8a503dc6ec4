//! Governance entry points: propose, vote, execute, dictate and upkeep.

use crate::error::TemplError;
use crate::event::TemplEvent;
use crate::templ::{Templ, Txn};
use templ_governance::{ProposalAction, ProposalRequest};
use templ_host::Host;
use templ_types::{mul_bps, Address};

impl Templ {
    /// Open a proposal. Returns its id.
    pub fn propose(
        &mut self,
        host: &mut dyn Host,
        proposer: Address,
        action: ProposalAction,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<u64, TemplError> {
        let request = ProposalRequest {
            proposer,
            action,
            title: title.into(),
            description: description.into(),
        };
        self.transact(host, "propose", |txn| txn.propose(request))
    }

    /// Cast or change a vote.
    pub fn vote(
        &mut self,
        host: &mut dyn Host,
        voter: Address,
        proposal_id: u64,
        support: bool,
    ) -> Result<(), TemplError> {
        self.transact(host, "vote", |txn| txn.vote(voter, proposal_id, support))
    }

    /// Apply a passed proposal. Anyone may call this once voting has ended.
    pub fn execute(&mut self, host: &mut dyn Host, proposal_id: u64) -> Result<(), TemplError> {
        self.transact(host, "execute", |txn| txn.execute(proposal_id))
    }

    /// Apply `action` without a vote. Priest only, and only under dictatorship.
    pub fn dictate(
        &mut self,
        host: &mut dyn Host,
        caller: Address,
        action: ProposalAction,
    ) -> Result<(), TemplError> {
        self.transact(host, "dictate", |txn| txn.dictate(caller, action))
    }

    /// Grant the one council seat the priest may hand out without a vote.
    pub fn bootstrap_council_seat(
        &mut self,
        host: &mut dyn Host,
        caller: Address,
        member: Address,
    ) -> Result<(), TemplError> {
        self.transact(host, "bootstrap_council_seat", |txn| {
            if caller != txn.state.settings.priest {
                return Err(TemplError::PriestOnly);
            }
            if !txn.state.members.contains(&member) {
                return Err(TemplError::NotMember);
            }
            txn.state.governance.bootstrap_council_seat(member)?;
            tracing::info!(member = %member, "council bootstrap seat granted");
            txn.emit(TemplEvent::CouncilMemberAdded { member });
            Ok(())
        })
    }

    /// Drop up to `max` ended, unexecuted proposals from the active index.
    pub fn prune_inactive_proposals(&mut self, host: &mut dyn Host, max: usize) -> Result<usize, TemplError> {
        self.transact(host, "prune_inactive_proposals", |txn| {
            let removed = txn.state.governance.prune_inactive(max, txn.now);
            if removed > 0 {
                txn.emit(TemplEvent::ProposalsPruned {
                    removed: removed as u64,
                });
            }
            Ok(removed)
        })
    }
}

impl Txn<'_> {
    fn propose(&mut self, request: ProposalRequest) -> Result<u64, TemplError> {
        let proposer = request.proposer;
        let templ = self.templ();
        let weights = self.state.vote_weights();
        let id = self.state.governance.propose(
            request,
            &templ,
            &self.state.members,
            &weights,
            self.now,
        )?;

        let governance = &self.state.governance;
        let exempt = governance.council_mode() && governance.council().contains(&proposer);
        let fee = if exempt {
            0
        } else {
            mul_bps(self.state.current_entry_fee(), self.state.settings.proposal_fee_bps)
                .ok_or(TemplError::Overflow)?
        };
        if fee > 0 {
            self.collect(&proposer, fee)?;
            self.state.treasury_balance = self
                .state
                .treasury_balance
                .checked_add(fee)
                .ok_or(TemplError::Overflow)?;
        }

        let (action, end_time, quorum_reached) = match self.state.governance.proposal(id) {
            Some(p) => (p.action.kind().to_string(), p.end_time, p.quorum_reached_at.is_some()),
            None => return Err(templ_governance::GovernanceError::InvalidProposal(id).into()),
        };
        self.emit(TemplEvent::ProposalCreated {
            id,
            proposer,
            action,
            end_time,
            fee_paid: fee,
        });
        if quorum_reached {
            self.emit(TemplEvent::QuorumReached { id, end_time });
        }
        Ok(id)
    }

    fn vote(&mut self, voter: Address, id: u64, support: bool) -> Result<(), TemplError> {
        let weights = self.state.vote_weights();
        let outcome = self.state.governance.vote(
            id,
            voter,
            support,
            &self.state.members,
            &weights,
            self.now,
        )?;
        self.emit(TemplEvent::VoteCast { id, voter, support });
        if outcome.quorum_reached {
            tracing::info!(id, end_time = outcome.end_time.as_secs(), "quorum reached");
            self.emit(TemplEvent::QuorumReached {
                id,
                end_time: outcome.end_time,
            });
        }
        Ok(())
    }

    fn execute(&mut self, id: u64) -> Result<(), TemplError> {
        let weights = self.state.vote_weights();
        let action = self
            .state
            .governance
            .begin_execution(id, &weights, self.now)?;
        self.apply(&action)?;

        tracing::info!(id, action = action.kind(), "proposal executed");
        self.emit(TemplEvent::ProposalExecuted {
            id,
            action: action.kind().to_string(),
        });
        Ok(())
    }

    fn dictate(&mut self, caller: Address, action: ProposalAction) -> Result<(), TemplError> {
        if !self.state.governance.dictatorship() {
            return Err(TemplError::NotDAO);
        }
        if caller != self.state.settings.priest {
            return Err(TemplError::PriestOnly);
        }
        action.validate(&self.templ())?;
        self.apply(&action)?;

        tracing::info!(priest = %caller, action = action.kind(), "action dictated");
        self.emit(TemplEvent::Dictated {
            priest: caller,
            action: action.kind().to_string(),
        });
        Ok(())
    }
}
