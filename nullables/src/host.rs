//! Nullable host — an in-memory chain for testing.

use crate::clock::NullClock;
use std::collections::BTreeMap;
use std::sync::Arc;
use templ_host::{CallOutcome, Checkpoint, Host, HostError, Reentry, TemplCall};
use templ_types::{Address, Asset, Timestamp};

/// Balances, allowances and contract storage. Cloned wholesale at every
/// checkpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct World {
    balances: BTreeMap<(Asset, Address), u128>,
    /// (token, owner, spender) → remaining allowance.
    allowances: BTreeMap<(Address, Address, Address), u128>,
    storage: BTreeMap<(Address, String), u128>,
}

impl World {
    fn balance(&self, asset: &Asset, holder: &Address) -> u128 {
        self.balances.get(&(*asset, *holder)).copied().unwrap_or(0)
    }

    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(&(*token, *owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn credit(&mut self, asset: &Asset, holder: &Address, amount: u128) -> Result<(), HostError> {
        let entry = self.balances.entry((*asset, *holder)).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(HostError::Overflow)?;
        Ok(())
    }

    fn move_funds(
        &mut self,
        asset: &Asset,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), HostError> {
        let available = self.balance(asset, from);
        if available < amount {
            return Err(HostError::InsufficientBalance {
                asset: *asset,
                holder: *from,
                needed: amount,
                available,
            });
        }
        if from == to || amount == 0 {
            return Ok(());
        }
        let receiver = self.balance(asset, to);
        receiver.checked_add(amount).ok_or(HostError::Overflow)?;
        self.balances.insert((*asset, *from), available - amount);
        self.credit(asset, to, amount)
    }

    fn spend_allowance(
        &mut self,
        token: &Address,
        owner: &Address,
        spender: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), HostError> {
        let allowed = self.allowance(token, owner, spender);
        if allowed < amount {
            return Err(HostError::InsufficientAllowance {
                token: *token,
                owner: *owner,
                spender: *spender,
                needed: amount,
                allowed,
            });
        }
        self.move_funds(&Asset::Token(*token), owner, to, amount)?;
        self.allowances
            .insert((*token, *owner, *spender), allowed - amount);
        Ok(())
    }
}

/// What a scripted contract can see and touch while it runs.
pub struct ContractEnv<'a> {
    world: &'a mut World,
    this: Address,
    now: Timestamp,
}

impl ContractEnv<'_> {
    /// Address of the running contract.
    pub fn this(&self) -> Address {
        self.this
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn balance_of(&self, asset: &Asset, holder: &Address) -> u128 {
        self.world.balance(asset, holder)
    }

    /// Move funds between any two accounts. Contracts are trusted to only
    /// move what their semantics allow.
    pub fn move_funds(
        &mut self,
        asset: &Asset,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), HostError> {
        self.world.move_funds(asset, from, to, amount)
    }

    /// Pull tokens from `owner` using the allowance granted to this contract.
    pub fn transfer_from(
        &mut self,
        token: &Address,
        owner: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), HostError> {
        let this = self.this;
        self.world.spend_allowance(token, owner, &this, to, amount)
    }

    pub fn set_allowance(&mut self, token: &Address, owner: &Address, spender: &Address, amount: u128) {
        self.world
            .allowances
            .insert((*token, *owner, *spender), amount);
    }

    pub fn load(&self, key: &str) -> u128 {
        self.world
            .storage
            .get(&(self.this, key.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn store(&mut self, key: &str, value: u128) {
        self.world.storage.insert((self.this, key.to_string()), value);
    }
}

/// A contract living at an address in the [`NullHost`]. Contracts are
/// stateless; persistent data goes through [`ContractEnv::store`].
pub trait ExternalContract: Send + Sync {
    fn call(
        &self,
        env: &mut ContractEnv<'_>,
        caller: &Address,
        value: u128,
        calldata: &[u8],
    ) -> Result<CallOutcome, HostError>;
}

/// An in-memory [`Host`] with a controllable clock.
///
/// Failed calls roll back their own effects. Checkpoints snapshot the whole
/// world so `revert_to` is exact.
#[derive(Default)]
pub struct NullHost {
    clock: NullClock,
    world: World,
    checkpoints: Vec<(Checkpoint, World)>,
    next_checkpoint: u64,
    contracts: BTreeMap<Address, Arc<dyn ExternalContract>>,
    receive_hooks: BTreeMap<Address, TemplCall>,
}

impl NullHost {
    pub fn new(start_secs: u64) -> Self {
        Self {
            clock: NullClock::new(start_secs),
            ..Self::default()
        }
    }

    pub fn clock(&self) -> &NullClock {
        &self.clock
    }

    pub fn advance(&self, secs: u64) {
        self.clock.advance(secs);
    }

    /// Mint `amount` of `asset` to `holder`.
    pub fn fund(&mut self, asset: Asset, holder: Address, amount: u128) {
        // test setup; overflow here is a broken test
        let current = self.world.balance(&asset, &holder);
        self.world
            .balances
            .insert((asset, holder), current.saturating_add(amount));
    }

    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: u128) {
        self.world.allowances.insert((token, owner, spender), amount);
    }

    pub fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> u128 {
        self.world.allowance(token, owner, spender)
    }

    /// Install a contract at `address`.
    pub fn deploy(&mut self, address: Address, contract: impl ExternalContract + 'static) {
        self.contracts.insert(address, Arc::new(contract));
    }

    /// Make `address` try to call back into the Templ whenever it receives funds.
    pub fn on_receive(&mut self, address: Address, call: TemplCall) {
        self.receive_hooks.insert(address, call);
    }

    pub fn storage(&self, contract: &Address, key: &str) -> u128 {
        self.world
            .storage
            .get(&(*contract, key.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Checkpoints currently open.
    pub fn open_checkpoints(&self) -> usize {
        self.checkpoints.len()
    }

    fn receive_hook(&self, to: &Address) -> Vec<Reentry> {
        self.receive_hooks
            .get(to)
            .map(|call| {
                vec![Reentry {
                    from: *to,
                    call: call.clone(),
                }]
            })
            .unwrap_or_default()
    }

    fn position(&self, checkpoint: Checkpoint) -> Result<usize, HostError> {
        self.checkpoints
            .iter()
            .position(|(cp, _)| *cp == checkpoint)
            .ok_or(HostError::UnknownCheckpoint(checkpoint.0))
    }
}

impl Host for NullHost {
    fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn balance_of(&self, asset: &Asset, holder: &Address) -> u128 {
        self.world.balance(asset, holder)
    }

    fn transfer(
        &mut self,
        asset: &Asset,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<Vec<Reentry>, HostError> {
        self.world.move_funds(asset, from, to, amount)?;
        Ok(self.receive_hook(to))
    }

    fn transfer_from(
        &mut self,
        token: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<Vec<Reentry>, HostError> {
        self.world.spend_allowance(token, from, spender, to, amount)?;
        Ok(self.receive_hook(to))
    }

    fn call(
        &mut self,
        caller: &Address,
        target: &Address,
        value: u128,
        calldata: &[u8],
    ) -> Result<CallOutcome, HostError> {
        let before = self.world.clone();
        let result = self.dispatch(caller, target, value, calldata);
        if let Err(err) = &result {
            tracing::debug!(contract = %target, error = %err, "null host call reverted");
            self.world = before;
        }
        result
    }

    fn checkpoint(&mut self) -> Checkpoint {
        let checkpoint = Checkpoint(self.next_checkpoint);
        self.next_checkpoint += 1;
        self.checkpoints.push((checkpoint, self.world.clone()));
        checkpoint
    }

    fn revert_to(&mut self, checkpoint: Checkpoint) -> Result<(), HostError> {
        let position = self.position(checkpoint)?;
        self.checkpoints.truncate(position + 1);
        if let Some((_, world)) = self.checkpoints.pop() {
            self.world = world;
        }
        Ok(())
    }

    fn commit(&mut self, checkpoint: Checkpoint) -> Result<(), HostError> {
        let position = self.position(checkpoint)?;
        self.checkpoints.truncate(position);
        Ok(())
    }
}

impl NullHost {
    fn dispatch(
        &mut self,
        caller: &Address,
        target: &Address,
        value: u128,
        calldata: &[u8],
    ) -> Result<CallOutcome, HostError> {
        self.world.move_funds(&Asset::Native, caller, target, value)?;
        let mut reentries = if value > 0 {
            self.receive_hook(target)
        } else {
            Vec::new()
        };
        let Some(contract) = self.contracts.get(target).cloned() else {
            // plain account: the value transfer is the whole call
            return Ok(CallOutcome {
                return_data: Vec::new(),
                reentries,
            });
        };
        let mut env = ContractEnv {
            world: &mut self.world,
            this: *target,
            now: self.clock.now(),
        };
        let mut outcome = contract.call(&mut env, caller, value, calldata)?;
        reentries.append(&mut outcome.reentries);
        outcome.reentries = reentries;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    struct Failing;

    impl ExternalContract for Failing {
        fn call(
            &self,
            env: &mut ContractEnv<'_>,
            _caller: &Address,
            _value: u128,
            _calldata: &[u8],
        ) -> Result<CallOutcome, HostError> {
            env.store("touched", 1);
            Err(HostError::CallReverted {
                target: env.this(),
                reason: "nope".into(),
            })
        }
    }

    #[test]
    fn test_transfer_moves_balance() {
        let mut host = NullHost::new(0);
        host.fund(Asset::Native, addr(1), 100);
        host.transfer(&Asset::Native, &addr(1), &addr(2), 40).unwrap();
        assert_eq!(host.balance_of(&Asset::Native, &addr(1)), 60);
        assert_eq!(host.balance_of(&Asset::Native, &addr(2)), 40);
        assert!(matches!(
            host.transfer(&Asset::Native, &addr(1), &addr(2), 61),
            Err(HostError::InsufficientBalance { available: 60, .. })
        ));
    }

    #[test]
    fn test_transfer_from_spends_allowance() {
        let token = addr(99);
        let mut host = NullHost::new(0);
        host.fund(Asset::Token(token), addr(1), 100);
        host.approve(token, addr(1), addr(5), 30);
        assert!(matches!(
            host.transfer_from(&token, &addr(5), &addr(1), &addr(5), 31),
            Err(HostError::InsufficientAllowance { allowed: 30, .. })
        ));
        host.transfer_from(&token, &addr(5), &addr(1), &addr(5), 30).unwrap();
        assert_eq!(host.allowance(&token, &addr(1), &addr(5)), 0);
        assert_eq!(host.balance_of(&Asset::Token(token), &addr(5)), 30);
    }

    #[test]
    fn test_checkpoint_revert_is_exact() {
        let mut host = NullHost::new(0);
        host.fund(Asset::Native, addr(1), 100);
        let cp = host.checkpoint();
        host.transfer(&Asset::Native, &addr(1), &addr(2), 100).unwrap();
        let inner = host.checkpoint();
        assert_eq!(host.open_checkpoints(), 2);
        host.revert_to(cp).unwrap();
        assert_eq!(host.balance_of(&Asset::Native, &addr(1)), 100);
        assert_eq!(host.open_checkpoints(), 0);
        assert_eq!(host.revert_to(inner), Err(HostError::UnknownCheckpoint(inner.0)));
    }

    #[test]
    fn test_commit_keeps_changes() {
        let mut host = NullHost::new(0);
        host.fund(Asset::Native, addr(1), 10);
        let cp = host.checkpoint();
        host.transfer(&Asset::Native, &addr(1), &addr(2), 10).unwrap();
        host.commit(cp).unwrap();
        assert_eq!(host.balance_of(&Asset::Native, &addr(2)), 10);
        assert_eq!(host.open_checkpoints(), 0);
    }

    #[test]
    fn test_failed_call_rolls_back() {
        let mut host = NullHost::new(0);
        host.fund(Asset::Native, addr(1), 10);
        host.deploy(addr(7), Failing);
        assert!(host.call(&addr(1), &addr(7), 5, &[]).is_err());
        assert_eq!(host.balance_of(&Asset::Native, &addr(1)), 10);
        assert_eq!(host.storage(&addr(7), "touched"), 0);
    }

    #[test]
    fn test_receive_hook_reports_reentry() {
        let mut host = NullHost::new(0);
        host.fund(Asset::Native, addr(1), 10);
        host.on_receive(addr(2), TemplCall::Propose);
        let reentries = host.transfer(&Asset::Native, &addr(1), &addr(2), 1).unwrap();
        assert_eq!(
            reentries,
            vec![Reentry {
                from: addr(2),
                call: TemplCall::Propose
            }]
        );
        let outcome = host.call(&addr(1), &addr(2), 1, &[]).unwrap();
        assert_eq!(outcome.reentries.len(), 1);
    }
}
