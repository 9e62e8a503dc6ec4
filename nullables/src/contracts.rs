//! Scripted contracts for the [`NullHost`](crate::NullHost).
//!
//! Calldata is a bincode-encoded call enum per contract kind.

use crate::host::{ContractEnv, ExternalContract};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use templ_host::{CallOutcome, HostError, Reentry, TemplCall};
use templ_types::{Address, Asset};

/// Calls understood by [`NullToken`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenCall {
    Approve { spender: Address, amount: u128 },
    Transfer { to: Address, amount: u128 },
}

/// Calls understood by [`NullStaking`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakingCall {
    Stake { token: Address, amount: u128 },
    Unstake { token: Address, amount: u128 },
}

impl TokenCall {
    pub fn encode(&self) -> Vec<u8> {
        bincode::serialize(self).unwrap_or_default()
    }
}

impl StakingCall {
    pub fn encode(&self) -> Vec<u8> {
        bincode::serialize(self).unwrap_or_default()
    }
}

fn decode<T: DeserializeOwned>(env: &ContractEnv<'_>, calldata: &[u8]) -> Result<T, HostError> {
    bincode::deserialize(calldata).map_err(|e| HostError::CallReverted {
        target: env.this(),
        reason: format!("undecodable calldata: {e}"),
    })
}

/// A fungible token whose balances live in the host ledger under
/// `Asset::Token(<its address>)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullToken;

impl ExternalContract for NullToken {
    fn call(
        &self,
        env: &mut ContractEnv<'_>,
        caller: &Address,
        _value: u128,
        calldata: &[u8],
    ) -> Result<CallOutcome, HostError> {
        let token = env.this();
        match decode(env, calldata)? {
            TokenCall::Approve { spender, amount } => {
                env.set_allowance(&token, caller, &spender, amount);
            }
            TokenCall::Transfer { to, amount } => {
                env.move_funds(&Asset::Token(token), caller, &to, amount)?;
            }
        }
        Ok(CallOutcome::returning(vec![1]))
    }
}

/// A staking vault that pulls approved tokens from the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStaking;

impl NullStaking {
    pub fn stake_key(staker: &Address, token: &Address) -> String {
        format!("stake:{staker}:{token}")
    }
}

impl ExternalContract for NullStaking {
    fn call(
        &self,
        env: &mut ContractEnv<'_>,
        caller: &Address,
        _value: u128,
        calldata: &[u8],
    ) -> Result<CallOutcome, HostError> {
        let this = env.this();
        match decode(env, calldata)? {
            StakingCall::Stake { token, amount } => {
                env.transfer_from(&token, caller, &this, amount)?;
                let key = Self::stake_key(caller, &token);
                let staked = env.load(&key).checked_add(amount).ok_or(HostError::Overflow)?;
                env.store(&key, staked);
            }
            StakingCall::Unstake { token, amount } => {
                let key = Self::stake_key(caller, &token);
                let staked = env.load(&key);
                let Some(left) = staked.checked_sub(amount) else {
                    return Err(HostError::CallReverted {
                        target: this,
                        reason: format!("only {staked} staked"),
                    });
                };
                env.move_funds(&Asset::Token(token), &this, caller, amount)?;
                env.store(&key, left);
            }
        }
        Ok(CallOutcome::default())
    }
}

/// Always reverts.
#[derive(Clone, Debug)]
pub struct NullReverter {
    pub reason: String,
}

impl NullReverter {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl ExternalContract for NullReverter {
    fn call(
        &self,
        env: &mut ContractEnv<'_>,
        _caller: &Address,
        _value: u128,
        _calldata: &[u8],
    ) -> Result<CallOutcome, HostError> {
        Err(HostError::CallReverted {
            target: env.this(),
            reason: self.reason.clone(),
        })
    }
}

/// Tries to call back into the Templ every time it is called.
#[derive(Clone, Debug)]
pub struct NullReentrant {
    pub call: TemplCall,
}

impl ExternalContract for NullReentrant {
    fn call(
        &self,
        env: &mut ContractEnv<'_>,
        _caller: &Address,
        _value: u128,
        _calldata: &[u8],
    ) -> Result<CallOutcome, HostError> {
        Ok(CallOutcome {
            return_data: Vec::new(),
            reentries: vec![Reentry {
                from: env.this(),
                call: self.call.clone(),
            }],
        })
    }
}
