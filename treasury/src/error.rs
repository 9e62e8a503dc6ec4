//! Treasury-specific errors.

use templ_types::Asset;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreasuryError {
    #[error("fee split must total 10000 basis points, got {total}")]
    InvalidPercentageSplit { total: u64 },

    #[error("amount must be non-zero")]
    AmountZero,

    #[error("cannot credit a reward pool with no members")]
    NoMembers,

    #[error("reward asset registry is full ({0} assets)")]
    RewardAssetLimitReached(usize),

    #[error("asset {0} has no reward pool")]
    UnknownRewardAsset(Asset),

    #[error("the access-token pool {0} cannot be removed")]
    PrimaryRewardAsset(Asset),

    #[error("reward pool for {asset} still owes {outstanding}")]
    RewardsNotSettled { asset: Asset, outstanding: u128 },

    #[error("arithmetic overflow in treasury accounting")]
    Overflow,
}
