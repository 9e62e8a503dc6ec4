//! Governance for a Templ.
//!
//! Lifecycle: Created → Voting → (Passed | Rejected) → Executed.
//! Proposals that end without execution linger until pruned from the active index.
//!
//! Key principles:
//! - One member = one vote, except for the priest's optional live weighting.
//! - Every pass/fail input (quorum, threshold, electorate) is snapshotted at creation.
//! - Only members that joined before a proposal was created may vote on it.

pub mod action;
pub mod council;
pub mod engine;
pub mod error;
pub mod index;
pub mod params;
pub mod proposal;
pub mod voting;

pub use action::{ExternalCall, ProposalAction, SplitUpdate};
pub use council::CouncilSet;
pub use engine::{Electorate, GovernanceEngine, ProposalRequest, VoteOutcome};
pub use error::GovernanceError;
pub use index::{ActiveProposalIndex, ProposalPage, MAX_PAGE_LIMIT};
pub use params::GovernanceParams;
pub use proposal::{Proposal, ProposalSnapshot, ProposalStatus};
pub use voting::{Tally, VoteWeights};
