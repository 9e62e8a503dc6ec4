//! The council: members with exclusive voting rights while council mode is on.

use crate::error::GovernanceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use templ_types::Address;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouncilSet {
    members: BTreeSet<Address>,
    bootstrap_consumed: bool,
}

impl CouncilSet {
    pub fn new(members: impl IntoIterator<Item = Address>) -> Self {
        Self {
            members: members.into_iter().collect(),
            bootstrap_consumed: false,
        }
    }

    pub fn contains(&self, who: &Address) -> bool {
        self.members.contains(who)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> impl Iterator<Item = &Address> {
        self.members.iter()
    }

    pub fn bootstrap_consumed(&self) -> bool {
        self.bootstrap_consumed
    }

    pub fn add(&mut self, member: Address) -> Result<(), GovernanceError> {
        if !self.members.insert(member) {
            return Err(GovernanceError::CouncilMemberExists);
        }
        Ok(())
    }

    /// Remove a seat. `council_mode` forbids emptying the council.
    pub fn remove(&mut self, member: &Address, council_mode: bool) -> Result<(), GovernanceError> {
        if !self.members.contains(member) {
            return Err(GovernanceError::NotCouncil);
        }
        if council_mode && self.members.len() == 1 {
            return Err(GovernanceError::CouncilMemberMinimum);
        }
        self.members.remove(member);
        Ok(())
    }

    /// The one-time seat the priest may grant without a vote.
    pub fn bootstrap(&mut self, member: Address) -> Result<(), GovernanceError> {
        if self.bootstrap_consumed {
            return Err(GovernanceError::CouncilBootstrapConsumed);
        }
        self.add(member)?;
        self.bootstrap_consumed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_once() {
        let mut council = CouncilSet::default();
        council.bootstrap(Address::from_low_u64(1)).unwrap();
        assert_eq!(
            council.bootstrap(Address::from_low_u64(2)),
            Err(GovernanceError::CouncilBootstrapConsumed)
        );
        assert_eq!(council.len(), 1);
    }

    #[test]
    fn test_failed_bootstrap_keeps_seat_available() {
        let mut council = CouncilSet::new([Address::from_low_u64(1)]);
        assert_eq!(
            council.bootstrap(Address::from_low_u64(1)),
            Err(GovernanceError::CouncilMemberExists)
        );
        assert!(!council.bootstrap_consumed());
    }

    #[test]
    fn test_last_member_protected_in_council_mode() {
        let a = Address::from_low_u64(1);
        let mut council = CouncilSet::new([a]);
        assert_eq!(council.remove(&a, true), Err(GovernanceError::CouncilMemberMinimum));
        council.remove(&a, false).unwrap();
        assert!(council.is_empty());
        assert_eq!(council.remove(&a, false), Err(GovernanceError::NotCouncil));
    }
}
