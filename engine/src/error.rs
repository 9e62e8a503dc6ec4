use templ_curve::CurveError;
use templ_governance::GovernanceError;
use templ_host::HostError;
use templ_treasury::TreasuryError;
use templ_types::{Address, Asset};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplError {
    #[error("address is already a member")]
    AlreadyMember,

    #[error("caller is not a member")]
    NotMember,

    #[error("joining is paused")]
    JoinIntakePaused,

    #[error("member limit of {max} reached")]
    MemberLimitReached { max: u64 },

    #[error("member limit {max} is below the current member count {current}")]
    MemberLimitTooLow { max: u64, current: u64 },

    #[error("only the templ itself may do this")]
    NotDAO,

    #[error("only the priest may do this")]
    PriestOnly,

    #[error("invalid recipient")]
    InvalidRecipient,

    #[error("amount must be non-zero")]
    AmountZero,

    #[error("treasury holds {available} of {asset} beyond member rewards, requested {requested}")]
    InsufficientTreasuryBalance {
        asset: Asset,
        available: u128,
        requested: u128,
    },

    #[error("no treasury funds in {0}")]
    NoTreasuryFunds(Asset),

    #[error("invalid call data: {0}")]
    InvalidCallData(&'static str),

    #[error("reentrant call rejected: {call}")]
    ReentrancyGuardReentrantCall { call: String },

    #[error("external call {index} to {target} failed: {reason}")]
    ExternalCallFailed {
        index: usize,
        target: Address,
        reason: String,
    },

    #[error("curve error: {0}")]
    Curve(#[from] CurveError),

    #[error("treasury error: {0}")]
    Treasury(#[from] TreasuryError),

    #[error("governance error: {0}")]
    Governance(#[from] GovernanceError),

    #[error("host error: {0}")]
    Host(#[from] HostError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("logging error: {0}")]
    Logging(String),

    #[error("arithmetic overflow")]
    Overflow,
}
