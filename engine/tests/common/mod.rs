//! Shared fixture for the engine integration tests: a Templ deployed on a
//! `NullHost` with the access token installed as a contract.

#![allow(dead_code)]

use templ_engine::{JoinReceipt, Templ, TemplConfig, TemplError, TemplEvent};
use templ_governance::ProposalAction;
use templ_host::Host;
use templ_nullables::{NullHost, NullToken};
use templ_types::{Address, Asset};

pub const START: u64 = 1_700_000_000;
pub const ENTRY_FEE: u64 = 1_000;
/// Longer than any voting window the default parameters allow.
pub const PAST_VOTING: u64 = 31 * 24 * 60 * 60;

pub fn addr(n: u64) -> Address {
    Address::from_low_u64(n)
}

pub fn templ_address() -> Address {
    addr(0x7e0)
}

pub fn token() -> Address {
    addr(0x70)
}

pub fn access() -> Asset {
    Asset::Token(token())
}

pub fn priest() -> Address {
    addr(1)
}

pub fn protocol() -> Address {
    addr(0x90)
}

pub fn burn() -> Address {
    addr(0xdead)
}

pub fn config() -> TemplConfig {
    TemplConfig {
        access_token: token(),
        priest: priest(),
        protocol_fee_recipient: protocol(),
        burn_address: burn(),
        entry_fee: ENTRY_FEE,
        ..TemplConfig::default()
    }
}

pub struct Fixture {
    pub host: NullHost,
    pub templ: Templ,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(config())
    }

    pub fn with_config(config: TemplConfig) -> Self {
        let mut host = NullHost::new(START);
        host.deploy(token(), NullToken);
        let templ = Templ::new(templ_address(), config, host.now()).expect("deploy templ");
        Self { host, templ }
    }

    /// Mint `amount` access tokens to `who` and approve the templ for them.
    pub fn fund(&mut self, who: Address, amount: u128) {
        self.host.fund(access(), who, amount);
        let allowed = self.host.allowance(&token(), &who, &templ_address());
        self.host
            .approve(token(), who, templ_address(), allowed + amount);
    }

    pub fn try_join(&mut self, who: Address) -> Result<JoinReceipt, TemplError> {
        let fee = self.templ.current_entry_fee();
        self.fund(who, fee);
        self.templ.join(&mut self.host, who, who, None)
    }

    pub fn join(&mut self, who: Address) -> JoinReceipt {
        self.try_join(who).expect("join")
    }

    pub fn balance(&self, asset: Asset, who: Address) -> u128 {
        self.host.balance_of(&asset, &who)
    }

    pub fn custody(&self) -> u128 {
        self.balance(access(), templ_address())
    }

    pub fn propose(&mut self, proposer: Address, action: ProposalAction) -> Result<u64, TemplError> {
        self.templ
            .propose(&mut self.host, proposer, action, "title", "description")
    }

    pub fn vote(&mut self, voter: Address, id: u64, support: bool) -> Result<(), TemplError> {
        self.templ.vote(&mut self.host, voter, id, support)
    }

    pub fn execute(&mut self, id: u64) -> Result<(), TemplError> {
        self.templ.execute(&mut self.host, id)
    }

    /// Propose, collect yes votes from `voters`, wait out the window and execute.
    pub fn pass(
        &mut self,
        proposer: Address,
        voters: &[Address],
        action: ProposalAction,
    ) -> Result<u64, TemplError> {
        let id = self.propose(proposer, action)?;
        for voter in voters {
            self.vote(*voter, id, true)?;
        }
        self.host.advance(PAST_VOTING);
        self.execute(id)?;
        Ok(id)
    }

    pub fn last_event(&self) -> Option<&TemplEvent> {
        self.templ.events().last()
    }
}

/// A templ with the priest plus `extra` paid members `addr(10)..`.
pub fn with_members(extra: u64) -> (Fixture, Vec<Address>) {
    let mut fx = Fixture::new();
    let members: Vec<Address> = (0..extra).map(|i| addr(10 + i)).collect();
    for member in &members {
        fx.join(*member);
    }
    (fx, members)
}
