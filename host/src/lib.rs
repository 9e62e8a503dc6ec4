//! Abstract host environment for a Templ.
//!
//! A Templ never holds balances itself. Every clock read, asset movement and
//! outbound call goes through the [`Host`] trait, so the same engine runs
//! against a chain adapter or against the in-memory host in `templ-nullables`.

pub mod call;
pub mod error;

pub use call::{CallOutcome, Checkpoint, Reentry, TemplCall};
pub use error::HostError;

use templ_types::{Address, Asset, Timestamp};

/// Everything a Templ needs from the outside world.
///
/// Transfers and calls report the callbacks they attempted into the Templ as
/// [`Reentry`] descriptors; the caller decides what to do with them.
pub trait Host {
    /// Current block time.
    fn now(&self) -> Timestamp;

    fn balance_of(&self, asset: &Asset, holder: &Address) -> u128;

    /// Move `amount` of `asset` held by `from`.
    fn transfer(
        &mut self,
        asset: &Asset,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<Vec<Reentry>, HostError>;

    /// Move tokens on behalf of `from` using the allowance granted to `spender`.
    fn transfer_from(
        &mut self,
        token: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<Vec<Reentry>, HostError>;

    /// Call `target` with `value` native units attached.
    fn call(
        &mut self,
        caller: &Address,
        target: &Address,
        value: u128,
        calldata: &[u8],
    ) -> Result<CallOutcome, HostError>;

    /// Mark the current host state so it can be restored.
    fn checkpoint(&mut self) -> Checkpoint;

    /// Restore the state captured by `checkpoint`, dropping later checkpoints.
    fn revert_to(&mut self, checkpoint: Checkpoint) -> Result<(), HostError>;

    /// Keep everything since `checkpoint` and forget the mark.
    fn commit(&mut self, checkpoint: Checkpoint) -> Result<(), HostError>;
}
