//! Events recorded by committed operations.

use crate::membership::JoinId;
use serde::{Deserialize, Serialize};
use templ_types::{Address, Asset, Timestamp};

/// Templ-level events that observers can subscribe to via the [`EventBus`].
///
/// Only operations that commit produce events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplEvent {
    TemplCreated {
        templ: Address,
        priest: Address,
        access_token: Address,
        genesis_members: u64,
    },
    MemberJoined {
        member: Address,
        payer: Address,
        join_id: JoinId,
        fee: u128,
        burned: u128,
        to_treasury: u128,
        to_member_pool: u128,
        protocol_fee: u128,
        referrer: Option<Address>,
        referral: u128,
        at: Timestamp,
    },
    RewardClaimed {
        member: Address,
        asset: Asset,
        amount: u128,
    },
    ProposalCreated {
        id: u64,
        proposer: Address,
        action: String,
        end_time: Timestamp,
        fee_paid: u128,
    },
    VoteCast {
        id: u64,
        voter: Address,
        support: bool,
    },
    QuorumReached {
        id: u64,
        end_time: Timestamp,
    },
    ProposalExecuted {
        id: u64,
        action: String,
    },
    /// The priest applied an action directly under dictatorship.
    Dictated {
        priest: Address,
        action: String,
    },
    ProposalsPruned {
        removed: u64,
    },
    JoinPauseUpdated {
        paused: bool,
    },
    ConfigUpdated {
        field: String,
    },
    PriestChanged {
        old: Address,
        new: Address,
    },
    DictatorshipUpdated {
        enabled: bool,
    },
    CouncilModeUpdated {
        enabled: bool,
    },
    CouncilMemberAdded {
        member: Address,
    },
    CouncilMemberRemoved {
        member: Address,
    },
    TreasuryWithdrawn {
        asset: Asset,
        recipient: Address,
        amount: u128,
    },
    TreasuryDisbanded {
        asset: Asset,
        amount: u128,
        per_member: u128,
    },
    RewardRemainderSwept {
        asset: Asset,
        recipient: Address,
        amount: u128,
    },
    RewardAssetRemoved {
        asset: Asset,
    },
    ExternalCallExecuted {
        index: usize,
        target: Address,
        value: u128,
    },
}

/// Fans committed events out to subscribers, inline and in commit order.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&TemplEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&TemplEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &TemplEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn listeners_run_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["first", "second"] {
            let log = Arc::clone(&log);
            bus.subscribe(Box::new(move |_| log.lock().unwrap().push(tag)));
        }

        bus.emit(&TemplEvent::JoinPauseUpdated { paused: true });
        bus.emit(&TemplEvent::JoinPauseUpdated { paused: false });

        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "first", "second"]);
    }

    #[test]
    fn listeners_can_filter_by_variant() {
        let claimed = Arc::new(Mutex::new(0u128));
        let mut bus = EventBus::default();
        let sink = Arc::clone(&claimed);
        bus.subscribe(Box::new(move |event| {
            if let TemplEvent::RewardClaimed { amount, .. } = event {
                *sink.lock().unwrap() += amount;
            }
        }));

        bus.emit(&TemplEvent::RewardClaimed {
            member: Address::from_low_u64(1),
            asset: Asset::Native,
            amount: 7,
        });
        bus.emit(&TemplEvent::ProposalsPruned { removed: 3 });

        assert_eq!(*claimed.lock().unwrap(), 7);
    }
}
