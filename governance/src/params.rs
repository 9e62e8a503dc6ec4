//! Governance parameters — themselves changeable by proposal.

use crate::error::GovernanceError;
use serde::{Deserialize, Serialize};
use templ_types::BPS_DENOMINATOR;

const HOUR: u64 = 3_600;
const DAY: u64 = 24 * HOUR;

pub const MIN_QUORUM_BPS: u32 = 1;
pub const MIN_YES_VOTE_THRESHOLD_BPS: u32 = 100;
pub const MIN_PRE_QUORUM_VOTING_PERIOD: u64 = 36 * HOUR;
pub const MIN_POST_QUORUM_VOTING_PERIOD: u64 = HOUR;
pub const MAX_VOTING_PERIOD: u64 = 30 * DAY;

/// Live governance parameters. Proposals copy what they need at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Share of the eligible electorate that must vote (basis points).
    #[serde(default = "default_quorum_bps")]
    pub quorum_bps: u32,

    /// Share of cast votes that must be yes (basis points).
    #[serde(default = "default_yes_vote_threshold_bps")]
    pub yes_vote_threshold_bps: u32,

    /// Voting window from creation while quorum is not reached.
    #[serde(default = "default_pre_quorum_voting_period")]
    pub pre_quorum_voting_period_secs: u64,

    /// Remaining window once quorum is reached.
    #[serde(default = "default_post_quorum_voting_period")]
    pub post_quorum_voting_period_secs: u64,
}

fn default_quorum_bps() -> u32 {
    3_300
}

fn default_yes_vote_threshold_bps() -> u32 {
    5_100
}

fn default_pre_quorum_voting_period() -> u64 {
    7 * DAY
}

fn default_post_quorum_voting_period() -> u64 {
    36 * HOUR
}

impl GovernanceParams {
    pub fn validate(&self) -> Result<(), GovernanceError> {
        check_quorum_bps(self.quorum_bps)?;
        check_yes_vote_threshold_bps(self.yes_vote_threshold_bps)?;
        check_pre_quorum_period(self.pre_quorum_voting_period_secs)?;
        check_post_quorum_period(self.post_quorum_voting_period_secs)?;
        Ok(())
    }
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            quorum_bps: default_quorum_bps(),
            yes_vote_threshold_bps: default_yes_vote_threshold_bps(),
            pre_quorum_voting_period_secs: default_pre_quorum_voting_period(),
            post_quorum_voting_period_secs: default_post_quorum_voting_period(),
        }
    }
}

pub fn check_quorum_bps(value: u32) -> Result<(), GovernanceError> {
    check_bps("quorum_bps", value, MIN_QUORUM_BPS)
}

pub fn check_yes_vote_threshold_bps(value: u32) -> Result<(), GovernanceError> {
    check_bps("yes_vote_threshold_bps", value, MIN_YES_VOTE_THRESHOLD_BPS)
}

pub fn check_pre_quorum_period(value: u64) -> Result<(), GovernanceError> {
    check_period(
        "pre_quorum_voting_period_secs",
        value,
        MIN_PRE_QUORUM_VOTING_PERIOD,
    )
}

pub fn check_post_quorum_period(value: u64) -> Result<(), GovernanceError> {
    check_period(
        "post_quorum_voting_period_secs",
        value,
        MIN_POST_QUORUM_VOTING_PERIOD,
    )
}

pub(crate) fn check_bps(field: &'static str, value: u32, min: u32) -> Result<(), GovernanceError> {
    if value < min || value > BPS_DENOMINATOR {
        return Err(GovernanceError::InvalidPercentage {
            field,
            value,
            min,
            max: BPS_DENOMINATOR,
        });
    }
    Ok(())
}

fn check_period(field: &'static str, value: u64, min: u64) -> Result<(), GovernanceError> {
    if value < min || value > MAX_VOTING_PERIOD {
        return Err(GovernanceError::InvalidVotingPeriod {
            field,
            value,
            min,
            max: MAX_VOTING_PERIOD,
        });
    }
    Ok(())
}
