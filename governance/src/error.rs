use templ_curve::CurveError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("caller is not a member")]
    NotMember,

    #[error("caller is not on the council for this proposal")]
    NotCouncil,

    #[error("proposal {0} does not exist or was already executed")]
    InvalidProposal(u64),

    #[error("proposer already has active proposal {0}")]
    ActiveProposalExists(u64),

    #[error("voter joined after the proposal was created")]
    JoinedAfterProposal,

    #[error("voting is still open until {end_time}")]
    VotingNotEnded { end_time: u64 },

    #[error("voting window has closed")]
    VotingEnded,

    #[error("proposal {0} did not pass")]
    ProposalNotPassed(u64),

    #[error("dictatorship is enabled")]
    DictatorshipEnabled,

    #[error("invalid call data: {0}")]
    InvalidCallData(&'static str),

    #[error("invalid recipient")]
    InvalidRecipient,

    #[error("amount must be non-zero")]
    AmountZero,

    #[error("{field} must be within {min}..={max} basis points, got {value}")]
    InvalidPercentage {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("{field} must be within {min}..={max} seconds, got {value}")]
    InvalidVotingPeriod {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("{field} exceeds {max} bytes")]
    MetadataTooLong { field: &'static str, max: usize },

    #[error("config update changes nothing")]
    EmptyUpdate,

    #[error("priest vote weight must be at least 1")]
    InvalidPriestWeight,

    #[error("page limit {0} outside 1..=100")]
    LimitOutOfRange(usize),

    #[error("council bootstrap seat already granted")]
    CouncilBootstrapConsumed,

    #[error("address is already on the council")]
    CouncilMemberExists,

    #[error("cannot remove the last council member while council mode is on")]
    CouncilMemberMinimum,

    #[error("council mode needs at least one council member")]
    NoCouncilMembers,

    #[error("{0}")]
    Curve(#[from] CurveError),
}
