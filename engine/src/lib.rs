//! Templ engine — one member-run treasury.
//!
//! The [`Templ`] aggregate ties the other crates together:
//! - Paid membership priced by the entry-fee curve
//! - Fee splitting into burn, treasury, member rewards and protocol
//! - Multi-asset member reward pools with per-member snapshots
//! - Proposal governance with council mode, priest weighting and dictatorship
//! - Execution of passed proposals, including outbound calls
//!
//! Every balance movement goes through a [`templ_host::Host`]; every mutating
//! entry point is atomic and guarded against reentry.

pub mod config;
pub mod error;
pub mod event;
pub mod governance;
pub mod guard;
pub mod join;
pub mod logging;
pub mod membership;
pub mod router;
pub mod state;
pub mod templ;
pub mod treasury;

pub use config::{TemplConfig, TemplMetadata};
pub use error::TemplError;
pub use event::{EventBus, TemplEvent};
pub use guard::ReentrancyGuard;
pub use join::JoinReceipt;
pub use logging::{init_logging, init_logging_from, try_init_logging, LogFormat};
pub use membership::{JoinId, Member, MembershipLedger};
pub use state::{TemplSettings, TemplState, TemplStats};
pub use templ::Templ;
pub use treasury::TreasuryInfo;
