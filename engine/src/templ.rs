//! The Templ aggregate: owned state, the transaction wrapper and read views.

use crate::config::TemplConfig;
use crate::error::TemplError;
use crate::event::{EventBus, TemplEvent};
use crate::guard::ReentrancyGuard;
use crate::membership::{Member, MembershipLedger};
use crate::state::{TemplSettings, TemplState, TemplStats};
use std::collections::BTreeMap;
use templ_governance::{
    CouncilSet, GovernanceEngine, Proposal, ProposalPage, ProposalStatus,
};
use templ_host::{Host, Reentry};
use templ_treasury::RewardLedger;
use templ_types::{Address, Asset, Timestamp};

/// One member-run treasury.
///
/// Every mutating entry point takes the host it runs against and is
/// all-or-nothing: on error neither the Templ nor the host changes.
pub struct Templ {
    state: TemplState,
    events: Vec<TemplEvent>,
    bus: EventBus,
    guard: ReentrancyGuard,
}

/// A running operation: a staged copy of the state plus the host.
pub(crate) struct Txn<'a> {
    pub(crate) host: &'a mut dyn Host,
    pub(crate) state: TemplState,
    pub(crate) events: Vec<TemplEvent>,
    pub(crate) now: Timestamp,
    guard: &'a ReentrancyGuard,
}

impl Txn<'_> {
    pub(crate) fn templ(&self) -> Address {
        self.state.address
    }

    pub(crate) fn emit(&mut self, event: TemplEvent) {
        self.events.push(event);
    }

    /// Reject any callback the host saw while running on our behalf.
    pub(crate) fn settle(&self, reentries: Vec<Reentry>) -> Result<(), TemplError> {
        for reentry in &reentries {
            self.guard.admit(reentry)?;
        }
        Ok(())
    }

    /// Send `amount` of `asset` from the templ's custody.
    pub(crate) fn pay_out(&mut self, asset: &Asset, to: &Address, amount: u128) -> Result<(), TemplError> {
        if amount == 0 {
            return Ok(());
        }
        let templ = self.templ();
        let reentries = self.host.transfer(asset, &templ, to, amount)?;
        self.settle(reentries)
    }

    /// Pull `amount` access tokens from `payer` into custody.
    pub(crate) fn collect(&mut self, payer: &Address, amount: u128) -> Result<(), TemplError> {
        if amount == 0 {
            return Ok(());
        }
        let templ = self.templ();
        let token = self.state.settings.access_token;
        let reentries = self
            .host
            .transfer_from(&token, &templ, payer, &templ, amount)?;
        self.settle(reentries)
    }

    /// Templ custody of `asset` not owed to members.
    pub(crate) fn available(&self, asset: &Asset) -> u128 {
        let custody = self.host.balance_of(asset, &self.templ());
        custody.saturating_sub(self.state.rewards.outstanding(asset))
    }
}

impl Templ {
    /// Deploy a Templ at `address`.
    pub fn new(address: Address, config: TemplConfig, now: Timestamp) -> Result<Self, TemplError> {
        if address.is_zero() {
            return Err(TemplError::InvalidRecipient);
        }
        config.validate()?;

        let mut members = MembershipLedger::default();
        for member in config.genesis_roster() {
            members.admit(member, now, false, BTreeMap::new());
        }
        let governance = GovernanceEngine::new(
            config.governance.clone(),
            CouncilSet::new(config.council.iter().copied()),
            config.council_mode,
            config.dictatorship,
        )?;
        let settings = TemplSettings {
            access_token: config.access_token,
            priest: config.priest,
            protocol_fee_recipient: config.protocol_fee_recipient,
            burn_address: config.burn_address,
            base_entry_fee: config.entry_fee as u128,
            curve: config.curve,
            split: config.split,
            max_members: config.max_members,
            join_paused: config.join_paused,
            proposal_fee_bps: config.proposal_fee_bps,
            referral_share_bps: config.referral_share_bps,
            priest_vote_weight: config.priest_vote_weight,
            priest_weight_threshold: config.priest_weight_threshold,
            metadata: config.metadata,
        };
        let mut state = TemplState {
            address,
            created_at: now,
            rewards: RewardLedger::new(Asset::Token(settings.access_token)),
            settings,
            members,
            treasury_balance: 0,
            governance,
            stats: TemplStats::default(),
        };
        if state.member_limit_reached() {
            state.settings.join_paused = true;
        }

        tracing::info!(
            templ = %address,
            priest = %state.settings.priest,
            access_token = %state.settings.access_token,
            members = state.members.count(),
            "templ created"
        );

        let created = TemplEvent::TemplCreated {
            templ: address,
            priest: state.settings.priest,
            access_token: state.settings.access_token,
            genesis_members: state.members.count(),
        };
        Ok(Self {
            state,
            events: vec![created],
            bus: EventBus::new(),
            guard: ReentrancyGuard::default(),
        })
    }

    /// Run `f` against a staged copy of the state inside a host checkpoint.
    ///
    /// Success commits both and publishes the staged events; failure
    /// restores both and drops the events.
    pub(crate) fn transact<T>(
        &mut self,
        host: &mut dyn Host,
        op: &'static str,
        f: impl FnOnce(&mut Txn<'_>) -> Result<T, TemplError>,
    ) -> Result<T, TemplError> {
        self.guard.enter(op)?;
        let checkpoint = host.checkpoint();
        let now = host.now();
        let mut txn = Txn {
            host: &mut *host,
            state: self.state.clone(),
            events: Vec::new(),
            now,
            guard: &self.guard,
        };
        let result = f(&mut txn);
        let Txn { state, events, .. } = txn;

        let outcome = match result {
            Ok(value) => match host.commit(checkpoint) {
                Ok(()) => {
                    self.state = state;
                    for event in events {
                        self.bus.emit(&event);
                        self.events.push(event);
                    }
                    Ok(value)
                }
                Err(e) => Err(e.into()),
            },
            Err(err) => {
                if let Err(revert) = host.revert_to(checkpoint) {
                    tracing::error!(op, error = %revert, "host revert failed");
                }
                tracing::debug!(op, error = %err, "operation rolled back");
                Err(err)
            }
        };
        self.guard.exit();
        outcome
    }

    // ── Views ───────────────────────────────────────────────────────────

    pub fn address(&self) -> Address {
        self.state.address
    }

    pub fn state(&self) -> &TemplState {
        &self.state
    }

    pub fn settings(&self) -> &TemplSettings {
        &self.state.settings
    }

    pub fn governance(&self) -> &GovernanceEngine {
        &self.state.governance
    }

    pub fn current_entry_fee(&self) -> u128 {
        self.state.current_entry_fee()
    }

    pub fn member(&self, who: &Address) -> Option<&Member> {
        self.state.members.get(who)
    }

    pub fn is_member(&self, who: &Address) -> bool {
        self.state.members.contains(who)
    }

    pub fn member_count(&self) -> u64 {
        self.state.members.count()
    }

    pub fn total_paid_joins(&self) -> u64 {
        self.state.members.total_paid_joins()
    }

    pub fn reward_assets(&self) -> &[Asset] {
        self.state.rewards.assets()
    }

    /// Rewards `member` can claim in `asset` right now.
    pub fn claimable(&self, member: &Address, asset: &Asset) -> u128 {
        self.state.members.get(member).map_or(0, |m| {
            self.state.rewards.claimable(asset, m.snapshot(asset))
        })
    }

    pub fn proposal(&self, id: u64) -> Option<&Proposal> {
        self.state.governance.proposal(id)
    }

    pub fn proposal_count(&self) -> u64 {
        self.state.governance.proposal_count()
    }

    pub fn proposal_status(&self, host: &dyn Host, id: u64) -> Option<ProposalStatus> {
        self.state
            .governance
            .status(id, host.now(), &self.state.vote_weights())
    }

    /// One page of proposals whose voting window is still open.
    pub fn active_proposals(
        &self,
        host: &dyn Host,
        offset: usize,
        limit: usize,
    ) -> Result<ProposalPage, TemplError> {
        Ok(self
            .state
            .governance
            .active_page(offset, limit, host.now())?)
    }

    /// Every event committed so far, oldest first.
    pub fn events(&self) -> &[TemplEvent] {
        &self.events
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&TemplEvent) + Send + Sync>) {
        self.bus.subscribe(listener);
    }

    // ── Persistence ─────────────────────────────────────────────────────

    /// Serialize the full state with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TemplError> {
        bincode::serialize(&self.state).map_err(|e| TemplError::Serialization(e.to_string()))
    }

    /// Restore a Templ saved with [`Templ::to_bytes`]. The event log and
    /// subscribers start empty.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TemplError> {
        let state: TemplState =
            bincode::deserialize(bytes).map_err(|e| TemplError::Serialization(e.to_string()))?;
        Ok(Self {
            state,
            events: Vec::new(),
            bus: EventBus::new(),
            guard: ReentrancyGuard::default(),
        })
    }
}
