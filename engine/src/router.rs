//! Applies a [`ProposalAction`] to a running operation.

use crate::error::TemplError;
use crate::event::TemplEvent;
use crate::templ::Txn;
use templ_curve::FeeCurve;
use templ_governance::action::{MAX_BATCH_CALLS, MAX_EXTERNAL_CALLDATA_BYTES};
use templ_governance::{ExternalCall, ProposalAction, SplitUpdate};
use templ_treasury::FeeSplit;
use templ_types::Address;

impl Txn<'_> {
    /// Dispatch one action. Any error aborts the surrounding operation.
    pub(crate) fn apply(&mut self, action: &ProposalAction) -> Result<(), TemplError> {
        tracing::debug!(action = action.kind(), "applying action");
        match action {
            ProposalAction::SetJoinPaused { paused } => {
                self.state.settings.join_paused = *paused;
                self.emit(TemplEvent::JoinPauseUpdated { paused: *paused });
            }
            ProposalAction::UpdateConfig { entry_fee, split } => {
                self.update_config(*entry_fee, *split)?;
            }
            ProposalAction::SetMaxMembers { max_members } => self.set_max_members(*max_members)?,
            ProposalAction::SetMetadata {
                name,
                description,
                logo_uri,
            } => {
                let metadata = &mut self.state.settings.metadata;
                metadata.name = name.clone();
                metadata.description = description.clone();
                metadata.logo_uri = logo_uri.clone();
                self.config_updated("metadata");
            }
            ProposalAction::SetProposalFeeBps { bps } => {
                self.state.settings.proposal_fee_bps = *bps;
                self.config_updated("proposal_fee_bps");
            }
            ProposalAction::SetReferralShareBps { bps } => {
                self.state.settings.referral_share_bps = *bps;
                self.config_updated("referral_share_bps");
            }
            ProposalAction::SetEntryFeeCurve {
                curve,
                base_entry_fee,
            } => self.set_entry_fee_curve(curve, *base_entry_fee)?,
            ProposalAction::SetBurnAddress { burn_address } => {
                non_zero(burn_address)?;
                self.state.settings.burn_address = *burn_address;
                self.config_updated("burn_address");
            }
            ProposalAction::SetQuorumBps { bps } => {
                self.state.governance.set_quorum_bps(*bps)?;
                self.config_updated("quorum_bps");
            }
            ProposalAction::SetYesVoteThresholdBps { bps } => {
                self.state.governance.set_yes_vote_threshold_bps(*bps)?;
                self.config_updated("yes_vote_threshold_bps");
            }
            ProposalAction::SetPreQuorumVotingPeriod { secs } => {
                self.state.governance.set_pre_quorum_voting_period(*secs)?;
                self.config_updated("pre_quorum_voting_period");
            }
            ProposalAction::SetPostQuorumVotingPeriod { secs } => {
                self.state.governance.set_post_quorum_voting_period(*secs)?;
                self.config_updated("post_quorum_voting_period");
            }
            ProposalAction::SetPriestVoteWeight { weight, threshold } => {
                self.state.settings.priest_vote_weight = *weight;
                self.state.settings.priest_weight_threshold = *threshold;
                self.config_updated("priest_vote_weight");
            }
            ProposalAction::ChangePriest { new_priest } => {
                non_zero(new_priest)?;
                let old = self.state.settings.priest;
                self.state.settings.priest = *new_priest;
                tracing::info!(old = %old, new = %new_priest, "priest changed");
                self.emit(TemplEvent::PriestChanged {
                    old,
                    new: *new_priest,
                });
            }
            ProposalAction::SetDictatorship { enabled } => {
                self.state.governance.set_dictatorship(*enabled);
                tracing::info!(enabled, "dictatorship updated");
                self.emit(TemplEvent::DictatorshipUpdated { enabled: *enabled });
            }
            ProposalAction::SetCouncilMode { enabled } => {
                self.state.governance.set_council_mode(*enabled)?;
                tracing::info!(enabled, "council mode updated");
                self.emit(TemplEvent::CouncilModeUpdated { enabled: *enabled });
            }
            ProposalAction::AddCouncilMember { member } => {
                if !self.state.members.contains(member) {
                    return Err(TemplError::NotMember);
                }
                self.state.governance.add_council_member(*member)?;
                self.emit(TemplEvent::CouncilMemberAdded { member: *member });
            }
            ProposalAction::RemoveCouncilMember { member } => {
                self.state.governance.remove_council_member(member)?;
                self.emit(TemplEvent::CouncilMemberRemoved { member: *member });
            }
            ProposalAction::WithdrawTreasury {
                asset,
                recipient,
                amount,
            } => self.withdraw(*asset, *recipient, *amount)?,
            ProposalAction::DisbandTreasury { asset } => self.disband(*asset)?,
            ProposalAction::SweepRewardRemainder { asset, recipient } => {
                self.sweep_reward_remainder(*asset, *recipient)?
            }
            ProposalAction::CleanupRewardAsset { asset } => self.cleanup_reward_asset(*asset)?,
            ProposalAction::CallExternal { call } => {
                self.call_external(std::slice::from_ref(call))?;
            }
            ProposalAction::BatchCallExternal {
                targets,
                values,
                calldatas,
            } => {
                if targets.is_empty() {
                    return Err(TemplError::InvalidCallData("empty batch"));
                }
                if targets.len() != values.len() || targets.len() != calldatas.len() {
                    return Err(TemplError::InvalidCallData("batch arity mismatch"));
                }
                if targets.len() > MAX_BATCH_CALLS {
                    return Err(TemplError::InvalidCallData("too many batched calls"));
                }
                self.call_external(&action.external_calls())?;
            }
        }
        Ok(())
    }

    fn config_updated(&mut self, field: &str) {
        tracing::info!(field, "config updated");
        self.emit(TemplEvent::ConfigUpdated {
            field: field.to_string(),
        });
    }

    fn update_config(&mut self, entry_fee: Option<u128>, split: Option<SplitUpdate>) -> Result<(), TemplError> {
        if let Some(update) = split {
            let protocol_bps = self.state.settings.split.protocol_bps;
            self.state.settings.split = FeeSplit::new(
                update.burn_bps,
                update.treasury_bps,
                update.member_pool_bps,
                protocol_bps,
            )?;
            self.config_updated("split");
        }
        if let Some(fee) = entry_fee {
            templ_curve::validate_entry_fee(fee)?;
            // the curve stays put; its anchor moves so the next join costs `fee`
            let paid = self.state.members.total_paid_joins();
            self.state.settings.base_entry_fee = self.state.settings.curve.base_for(paid, fee);
            self.config_updated("entry_fee");
        }
        Ok(())
    }

    fn set_max_members(&mut self, max_members: u64) -> Result<(), TemplError> {
        let current = self.state.members.count();
        if max_members > 0 && max_members < current {
            return Err(TemplError::MemberLimitTooLow {
                max: max_members,
                current,
            });
        }
        self.state.settings.max_members = max_members;
        self.config_updated("max_members");
        if self.state.member_limit_reached() && !self.state.settings.join_paused {
            self.state.settings.join_paused = true;
            self.emit(TemplEvent::JoinPauseUpdated { paused: true });
        }
        Ok(())
    }

    fn set_entry_fee_curve(&mut self, curve: &FeeCurve, base: Option<u128>) -> Result<(), TemplError> {
        curve.validate()?;
        let paid = self.state.members.total_paid_joins();
        let base = match base {
            Some(base) => {
                templ_curve::validate_entry_fee(base)?;
                base
            }
            None => curve.base_for(paid, self.state.current_entry_fee()),
        };
        self.state.settings.curve = curve.clone();
        self.state.settings.base_entry_fee = base;
        self.config_updated("entry_fee_curve");
        Ok(())
    }

    /// Run `calls` in order with the templ as caller. The first failure
    /// aborts the rest.
    fn call_external(&mut self, calls: &[ExternalCall]) -> Result<(), TemplError> {
        let templ = self.templ();
        for call in calls {
            check_call(call, &templ)?;
        }
        for (index, call) in calls.iter().enumerate() {
            let outcome = self
                .host
                .call(&templ, &call.target, call.value, &call.calldata)
                .map_err(|e| {
                    tracing::warn!(index, contract = %call.target, error = %e, "external call failed");
                    TemplError::ExternalCallFailed {
                        index,
                        target: call.target,
                        reason: e.to_string(),
                    }
                })?;
            self.settle(outcome.reentries)?;
            tracing::info!(index, contract = %call.target, value = call.value, "external call executed");
            self.emit(TemplEvent::ExternalCallExecuted {
                index,
                target: call.target,
                value: call.value,
            });
        }

        let access = self.state.access_asset();
        let available = self.available(&access);
        if self.state.treasury_balance > available {
            self.state.treasury_balance = available;
        }
        self.ensure_solvent()
    }
}

fn non_zero(address: &Address) -> Result<(), TemplError> {
    if address.is_zero() {
        return Err(TemplError::InvalidRecipient);
    }
    Ok(())
}

fn check_call(call: &ExternalCall, templ: &Address) -> Result<(), TemplError> {
    non_zero(&call.target)?;
    if call.target == *templ {
        return Err(TemplError::InvalidCallData("call targets the templ itself"));
    }
    if call.calldata.len() > MAX_EXTERNAL_CALLDATA_BYTES {
        return Err(TemplError::InvalidCallData("calldata too large"));
    }
    Ok(())
}
