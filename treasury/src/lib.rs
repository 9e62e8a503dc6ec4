//! Treasury accounting for a Templ.
//!
//! Every entry fee is split into burn / treasury / member-pool / protocol
//! buckets. The member pool is distributed through per-asset reward pools that
//! carry integer-division dust forward:
//!
//! `claimable(m) = cumulative_per_member − snapshot(m)`
//! `Σ claimable + remainder = total_credited − total_claimed`
//!
//! This crate is pure bookkeeping; moving tokens is the engine's job.

pub mod error;
pub mod ledger;
pub mod pool;
pub mod split;

pub use error::TreasuryError;
pub use ledger::{RewardLedger, MAX_REWARD_ASSETS};
pub use pool::{CreditOutcome, RewardPool};
pub use split::{FeeBreakdown, FeeSplit};
