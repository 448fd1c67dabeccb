//! Proposal store: the id-indexed table of every proposal ever opened.

use crate::error::StoreError;
use crate::proposal::Proposal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vdao_types::ProposalId;

/// Owns all proposal records. Append on create, mutate in place afterwards,
/// never delete.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProposalStore {
    proposals: BTreeMap<ProposalId, Proposal>,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record. An id that is already taken is rejected and the
    /// existing record is left untouched.
    pub fn create(&mut self, proposal: Proposal) -> Result<(), StoreError> {
        let id = proposal.id();
        if self.proposals.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        self.proposals.insert(id, proposal);
        Ok(())
    }

    pub fn get(&self, id: ProposalId) -> Option<&Proposal> {
        self.proposals.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ProposalId) -> Option<&mut Proposal> {
        self.proposals.get_mut(&id)
    }

    pub fn contains(&self, id: ProposalId) -> bool {
        self.proposals.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    /// All proposals, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdao_types::{Identity, Timestamp, TokenAmount};

    fn proposal(id: u64, amount: u128) -> Proposal {
        Proposal::new(
            ProposalId::new(id),
            Identity::new([1; 20]),
            Identity::new([2; 20]),
            TokenAmount::new(amount),
            Timestamp::new(10),
        )
    }

    #[test]
    fn create_then_get() {
        let mut store = ProposalStore::new();
        store.create(proposal(666, 9)).unwrap();
        let p = store.get(ProposalId::new(666)).unwrap();
        assert_eq!(p.amount(), TokenAmount::new(9));
        assert!(store.contains(ProposalId::new(666)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicate_id_rejected_without_overwrite() {
        let mut store = ProposalStore::new();
        store.create(proposal(1, 100)).unwrap();
        let err = store.create(proposal(1, 999)).unwrap_err();
        assert_eq!(err, StoreError::AlreadyExists(ProposalId::new(1)));
        assert_eq!(
            store.get(ProposalId::new(1)).unwrap().amount(),
            TokenAmount::new(100)
        );
    }

    #[test]
    fn missing_id_is_none() {
        let mut store = ProposalStore::new();
        assert!(store.get(ProposalId::new(5)).is_none());
        assert!(store.get_mut(ProposalId::new(5)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn iter_is_ordered_by_id() {
        let mut store = ProposalStore::new();
        for id in [30, 10, 20] {
            store.create(proposal(id, 1)).unwrap();
        }
        let ids: Vec<u64> = store.iter().map(|p| p.id().value()).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }
}
