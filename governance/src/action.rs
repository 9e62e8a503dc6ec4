//! What a proposal does when executed.

use crate::error::GovernanceError;
use crate::params::{
    check_bps, check_post_quorum_period, check_pre_quorum_period, check_quorum_bps,
    check_yes_vote_threshold_bps,
};
use serde::{Deserialize, Serialize};
use templ_curve::{validate_entry_fee, FeeCurve};
use templ_types::{Address, Asset};

pub const MAX_TITLE_BYTES: usize = 256;
pub const MAX_DESCRIPTION_BYTES: usize = 4_096;
pub const MAX_NAME_BYTES: usize = 256;
pub const MAX_LOGO_URI_BYTES: usize = 2_048;
pub const MAX_EXTERNAL_CALLDATA_BYTES: usize = 4_096;
pub const MAX_BATCH_CALLS: usize = 16;

/// Replacement for the governable part of the fee split. The protocol share is fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitUpdate {
    pub burn_bps: u32,
    pub treasury_bps: u32,
    pub member_pool_bps: u32,
}

/// One outbound call made with treasury authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCall {
    pub target: Address,
    pub value: u128,
    pub calldata: Vec<u8>,
}

/// Every action a proposal can carry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalAction {
    SetJoinPaused {
        paused: bool,
    },
    UpdateConfig {
        entry_fee: Option<u128>,
        split: Option<SplitUpdate>,
    },
    SetMaxMembers {
        max_members: u64,
    },
    SetMetadata {
        name: String,
        description: String,
        logo_uri: String,
    },
    SetProposalFeeBps {
        bps: u32,
    },
    SetReferralShareBps {
        bps: u32,
    },
    /// Replace the curve. Without a base the current price is kept and the
    /// base re-derived from it.
    SetEntryFeeCurve {
        curve: FeeCurve,
        base_entry_fee: Option<u128>,
    },
    SetBurnAddress {
        burn_address: Address,
    },
    SetQuorumBps {
        bps: u32,
    },
    SetYesVoteThresholdBps {
        bps: u32,
    },
    SetPreQuorumVotingPeriod {
        secs: u64,
    },
    SetPostQuorumVotingPeriod {
        secs: u64,
    },
    SetPriestVoteWeight {
        weight: u64,
        threshold: u64,
    },
    ChangePriest {
        new_priest: Address,
    },
    SetDictatorship {
        enabled: bool,
    },
    SetCouncilMode {
        enabled: bool,
    },
    AddCouncilMember {
        member: Address,
    },
    RemoveCouncilMember {
        member: Address,
    },
    WithdrawTreasury {
        asset: Asset,
        recipient: Address,
        amount: u128,
    },
    DisbandTreasury {
        asset: Asset,
    },
    SweepRewardRemainder {
        asset: Asset,
        recipient: Address,
    },
    CleanupRewardAsset {
        asset: Asset,
    },
    CallExternal {
        call: ExternalCall,
    },
    BatchCallExternal {
        targets: Vec<Address>,
        values: Vec<u128>,
        calldatas: Vec<Vec<u8>>,
    },
}

impl ProposalAction {
    /// Short stable name, used in events and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetJoinPaused { .. } => "set_join_paused",
            Self::UpdateConfig { .. } => "update_config",
            Self::SetMaxMembers { .. } => "set_max_members",
            Self::SetMetadata { .. } => "set_metadata",
            Self::SetProposalFeeBps { .. } => "set_proposal_fee_bps",
            Self::SetReferralShareBps { .. } => "set_referral_share_bps",
            Self::SetEntryFeeCurve { .. } => "set_entry_fee_curve",
            Self::SetBurnAddress { .. } => "set_burn_address",
            Self::SetQuorumBps { .. } => "set_quorum_bps",
            Self::SetYesVoteThresholdBps { .. } => "set_yes_vote_threshold_bps",
            Self::SetPreQuorumVotingPeriod { .. } => "set_pre_quorum_voting_period",
            Self::SetPostQuorumVotingPeriod { .. } => "set_post_quorum_voting_period",
            Self::SetPriestVoteWeight { .. } => "set_priest_vote_weight",
            Self::ChangePriest { .. } => "change_priest",
            Self::SetDictatorship { .. } => "set_dictatorship",
            Self::SetCouncilMode { .. } => "set_council_mode",
            Self::AddCouncilMember { .. } => "add_council_member",
            Self::RemoveCouncilMember { .. } => "remove_council_member",
            Self::WithdrawTreasury { .. } => "withdraw_treasury",
            Self::DisbandTreasury { .. } => "disband_treasury",
            Self::SweepRewardRemainder { .. } => "sweep_reward_remainder",
            Self::CleanupRewardAsset { .. } => "cleanup_reward_asset",
            Self::CallExternal { .. } => "call_external",
            Self::BatchCallExternal { .. } => "batch_call_external",
        }
    }

    /// Only the dictatorship toggle stays live while dictatorship is on.
    pub fn is_dictatorship_toggle(&self) -> bool {
        matches!(self, Self::SetDictatorship { .. })
    }

    /// Emergency actions skip quorum when the priest proposes them.
    pub fn is_emergency(&self) -> bool {
        matches!(
            self,
            Self::DisbandTreasury { .. } | Self::SetJoinPaused { paused: true }
        )
    }

    /// The outbound calls this action makes, in order.
    pub fn external_calls(&self) -> Vec<ExternalCall> {
        match self {
            Self::CallExternal { call } => vec![call.clone()],
            Self::BatchCallExternal {
                targets,
                values,
                calldatas,
            } => targets
                .iter()
                .zip(values)
                .zip(calldatas)
                .map(|((target, value), calldata)| ExternalCall {
                    target: *target,
                    value: *value,
                    calldata: calldata.clone(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Parameter checks that need no contract state. `templ` is the
    /// contract's own address, which outbound calls may not target.
    pub fn validate(&self, templ: &Address) -> Result<(), GovernanceError> {
        match self {
            Self::UpdateConfig { entry_fee, split } => {
                if entry_fee.is_none() && split.is_none() {
                    return Err(GovernanceError::EmptyUpdate);
                }
                if let Some(fee) = entry_fee {
                    validate_entry_fee(*fee)?;
                }
                if let Some(split) = split {
                    check_bps("burn_bps", split.burn_bps, 0)?;
                    check_bps("treasury_bps", split.treasury_bps, 0)?;
                    check_bps("member_pool_bps", split.member_pool_bps, 0)?;
                }
            }
            Self::SetMetadata {
                name,
                description,
                logo_uri,
            } => {
                check_len("name", name, MAX_NAME_BYTES)?;
                check_len("description", description, MAX_DESCRIPTION_BYTES)?;
                check_len("logo_uri", logo_uri, MAX_LOGO_URI_BYTES)?;
            }
            Self::SetProposalFeeBps { bps } => check_bps("proposal_fee_bps", *bps, 0)?,
            Self::SetReferralShareBps { bps } => check_bps("referral_share_bps", *bps, 0)?,
            Self::SetEntryFeeCurve {
                curve,
                base_entry_fee,
            } => {
                curve.validate()?;
                if let Some(base) = base_entry_fee {
                    validate_entry_fee(*base)?;
                }
            }
            Self::SetBurnAddress { burn_address } => non_zero(burn_address)?,
            Self::SetQuorumBps { bps } => check_quorum_bps(*bps)?,
            Self::SetYesVoteThresholdBps { bps } => check_yes_vote_threshold_bps(*bps)?,
            Self::SetPreQuorumVotingPeriod { secs } => check_pre_quorum_period(*secs)?,
            Self::SetPostQuorumVotingPeriod { secs } => check_post_quorum_period(*secs)?,
            Self::SetPriestVoteWeight { weight, .. } => {
                if *weight == 0 {
                    return Err(GovernanceError::InvalidPriestWeight);
                }
            }
            Self::ChangePriest { new_priest } => non_zero(new_priest)?,
            Self::AddCouncilMember { member } | Self::RemoveCouncilMember { member } => {
                non_zero(member)?
            }
            Self::WithdrawTreasury {
                recipient, amount, ..
            } => {
                non_zero(recipient)?;
                if *amount == 0 {
                    return Err(GovernanceError::AmountZero);
                }
            }
            Self::SweepRewardRemainder { recipient, .. } => non_zero(recipient)?,
            Self::CallExternal { call } => check_call(call, templ)?,
            Self::BatchCallExternal {
                targets,
                values,
                calldatas,
            } => {
                if targets.is_empty() {
                    return Err(GovernanceError::InvalidCallData("empty batch"));
                }
                if targets.len() != values.len() || targets.len() != calldatas.len() {
                    return Err(GovernanceError::InvalidCallData("batch arity mismatch"));
                }
                if targets.len() > MAX_BATCH_CALLS {
                    return Err(GovernanceError::InvalidCallData("too many batched calls"));
                }
                for call in self.external_calls() {
                    check_call(&call, templ)?;
                }
            }
            Self::SetJoinPaused { .. }
            | Self::SetMaxMembers { .. }
            | Self::SetDictatorship { .. }
            | Self::SetCouncilMode { .. }
            | Self::DisbandTreasury { .. }
            | Self::CleanupRewardAsset { .. } => {}
        }
        Ok(())
    }
}

pub(crate) fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), GovernanceError> {
    if value.len() > max {
        return Err(GovernanceError::MetadataTooLong { field, max });
    }
    Ok(())
}

fn non_zero(address: &Address) -> Result<(), GovernanceError> {
    if address.is_zero() {
        return Err(GovernanceError::InvalidRecipient);
    }
    Ok(())
}

fn check_call(call: &ExternalCall, templ: &Address) -> Result<(), GovernanceError> {
    if call.target.is_zero() {
        return Err(GovernanceError::InvalidRecipient);
    }
    if call.target == *templ {
        return Err(GovernanceError::InvalidCallData("call targets the templ itself"));
    }
    if call.calldata.len() > MAX_EXTERNAL_CALLDATA_BYTES {
        return Err(GovernanceError::InvalidCallData("calldata too long"));
    }
    Ok(())
}
