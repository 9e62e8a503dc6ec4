//! Index of proposals that have not been executed or pruned.

use crate::error::GovernanceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use templ_types::Address;

pub const MAX_PAGE_LIMIT: usize = 100;

/// One page of active proposal ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalPage {
    pub ids: Vec<u64>,
    pub has_more: bool,
}

/// Proposal ids in creation order, plus each proposer's latest proposal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveProposalIndex {
    ids: Vec<u64>,
    latest_by_proposer: BTreeMap<Address, u64>,
}

impl ActiveProposalIndex {
    pub fn insert(&mut self, id: u64, proposer: Address) {
        self.ids.push(id);
        self.latest_by_proposer.insert(proposer, id);
    }

    pub fn remove(&mut self, id: u64) {
        self.ids.retain(|existing| *existing != id);
        self.latest_by_proposer.retain(|_, latest| *latest != id);
    }

    pub fn latest_of(&self, proposer: &Address) -> Option<u64> {
        self.latest_by_proposer.get(proposer).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Drop up to `max` ended entries, newest first.
    ///
    /// Stops without touching anything while the newest entry is still
    /// active. Returns the number removed.
    pub fn prune(&mut self, max: usize, is_active: impl Fn(u64) -> bool) -> usize {
        match self.ids.last() {
            Some(newest) if !is_active(*newest) => {}
            _ => return 0,
        }
        let mut removed = Vec::new();
        let mut i = self.ids.len();
        while i > 0 && removed.len() < max {
            i -= 1;
            if !is_active(self.ids[i]) {
                removed.push(self.ids.remove(i));
            }
        }
        self.latest_by_proposer
            .retain(|_, latest| !removed.contains(latest));
        removed.len()
    }

    /// Page over the entries that are still active.
    pub fn page(
        &self,
        offset: usize,
        limit: usize,
        is_active: impl Fn(u64) -> bool,
    ) -> Result<ProposalPage, GovernanceError> {
        if limit == 0 || limit > MAX_PAGE_LIMIT {
            return Err(GovernanceError::LimitOutOfRange(limit));
        }
        let mut active = self.ids.iter().copied().filter(|id| is_active(*id)).skip(offset);
        let ids: Vec<u64> = active.by_ref().take(limit).collect();
        let has_more = active.next().is_some();
        Ok(ProposalPage { ids, has_more })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(n: u64) -> ActiveProposalIndex {
        let mut index = ActiveProposalIndex::default();
        for id in 0..n {
            index.insert(id, Address::from_low_u64(id + 1));
        }
        index
    }

    #[test]
    fn test_prune_stops_when_newest_active() {
        let mut idx = index(5);
        assert_eq!(idx.prune(10, |id| id == 4), 0);
        assert_eq!(idx.len(), 5);
    }

    #[test]
    fn test_prune_newest_first_up_to_max() {
        let mut idx = index(5);
        // 1 is still active
        assert_eq!(idx.prune(2, |id| id == 1), 2);
        assert_eq!(idx.ids(), &[0, 1, 2]);
        assert_eq!(idx.prune(10, |id| id == 1), 2);
        assert_eq!(idx.ids(), &[1]);
    }

    #[test]
    fn test_proposer_entries_leave_with_their_proposal() {
        let mut idx = index(3);
        idx.remove(0);
        assert_eq!(idx.latest_of(&Address::from_low_u64(1)), None);
        assert_eq!(idx.prune(10, |_| false), 2);
        assert_eq!(idx.latest_of(&Address::from_low_u64(2)), None);
        assert_eq!(idx.latest_of(&Address::from_low_u64(3)), None);
        assert!(idx.is_empty());

        // a newer proposal from the same address is not dropped with the old one
        let mut idx = ActiveProposalIndex::default();
        let proposer = Address::from_low_u64(9);
        idx.insert(0, proposer);
        idx.insert(1, proposer);
        idx.remove(0);
        assert_eq!(idx.latest_of(&proposer), Some(1));
    }

    #[test]
    fn test_page_limits() {
        let idx = index(3);
        assert_eq!(idx.page(0, 0, |_| true), Err(GovernanceError::LimitOutOfRange(0)));
        assert_eq!(
            idx.page(0, 101, |_| true),
            Err(GovernanceError::LimitOutOfRange(101))
        );
        let page = idx.page(0, 2, |_| true).unwrap();
        assert_eq!(page, ProposalPage { ids: vec![0, 1], has_more: true });
        let page = idx.page(2, 2, |_| true).unwrap();
        assert_eq!(page, ProposalPage { ids: vec![2], has_more: false });
        let page = idx.page(0, 5, |id| id != 1).unwrap();
        assert_eq!(page.ids, vec![0, 2]);
    }
}
