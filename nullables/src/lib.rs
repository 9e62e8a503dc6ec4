//! In-memory stand-ins for everything outside a Templ.
//!
//! [`NullHost`] keeps balances, allowances and contract storage in maps,
//! runs scripted contracts for outbound calls and snapshots the whole world
//! at every checkpoint, so tests can drive a Templ without a chain.

pub mod clock;
pub mod contracts;
pub mod host;

pub use clock::NullClock;
pub use contracts::{
    NullReentrant, NullReverter, NullStaking, NullToken, StakingCall, TokenCall,
};
pub use host::{ContractEnv, ExternalContract, NullHost};
