use templ_types::{Address, Asset};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("{holder} holds {available} of {asset}, needs {needed}")]
    InsufficientBalance {
        asset: Asset,
        holder: Address,
        needed: u128,
        available: u128,
    },

    #[error("{spender} may move {allowed} of token {token} for {owner}, needs {needed}")]
    InsufficientAllowance {
        token: Address,
        owner: Address,
        spender: Address,
        needed: u128,
        allowed: u128,
    },

    #[error("call to {target} reverted: {reason}")]
    CallReverted { target: Address, reason: String },

    #[error("unknown checkpoint {0}")]
    UnknownCheckpoint(u64),

    #[error("balance overflow")]
    Overflow,
}
