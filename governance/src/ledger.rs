//! Vote ledger: who voted on what, and with how much weight.
//!
//! Kept apart from the proposal records so vote history stays independent of
//! proposal mutation.

use crate::error::VoteError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vdao_types::{Identity, ProposalId, Timestamp, TokenAmount};

/// Direction of a vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    For,
    Against,
}

impl VoteChoice {
    pub fn from_support(support: bool) -> Self {
        if support {
            Self::For
        } else {
            Self::Against
        }
    }

    pub fn is_for(&self) -> bool {
        matches!(self, Self::For)
    }
}

/// One recorded vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub choice: VoteChoice,
    /// Voter's balance when the vote was cast.
    pub weight: TokenAmount,
    pub cast_at: Timestamp,
}

/// At most one [`VoteRecord`] per (voter, proposal).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VoteLedger {
    records: BTreeMap<(ProposalId, Identity), VoteRecord>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote. A second record for the same pair is rejected.
    pub fn record(
        &mut self,
        voter: Identity,
        id: ProposalId,
        record: VoteRecord,
    ) -> Result<(), VoteError> {
        let key = (id, voter);
        if self.records.contains_key(&key) {
            return Err(VoteError::AlreadyVoted { voter, id });
        }
        self.records.insert(key, record);
        Ok(())
    }

    pub fn get(&self, voter: &Identity, id: ProposalId) -> Option<&VoteRecord> {
        self.records.get(&(id, *voter))
    }

    pub fn has_voted(&self, voter: &Identity, id: ProposalId) -> bool {
        self.records.contains_key(&(id, *voter))
    }

    /// Every vote cast on one proposal, ordered by voter.
    pub fn votes_for_proposal(
        &self,
        id: ProposalId,
    ) -> impl Iterator<Item = (&Identity, &VoteRecord)> {
        self.records
            .range((id, Identity::ZERO)..)
            .take_while(move |((pid, _), _)| *pid == id)
            .map(|((_, voter), record)| (voter, record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voter(seed: u8) -> Identity {
        Identity::new([seed; 20])
    }

    fn record(choice: VoteChoice, weight: u128) -> VoteRecord {
        VoteRecord {
            choice,
            weight: TokenAmount::new(weight),
            cast_at: Timestamp::new(1),
        }
    }

    #[test]
    fn second_record_for_pair_rejected() {
        let mut ledger = VoteLedger::new();
        let id = ProposalId::new(666);
        ledger.record(voter(1), id, record(VoteChoice::For, 10)).unwrap();

        let err = ledger
            .record(voter(1), id, record(VoteChoice::Against, 99))
            .unwrap_err();
        assert_eq!(err, VoteError::AlreadyVoted { voter: voter(1), id });
        assert_eq!(ledger.get(&voter(1), id).unwrap().weight, TokenAmount::new(10));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn same_voter_different_proposals() {
        let mut ledger = VoteLedger::new();
        ledger
            .record(voter(1), ProposalId::new(1), record(VoteChoice::For, 1))
            .unwrap();
        ledger
            .record(voter(1), ProposalId::new(2), record(VoteChoice::Against, 1))
            .unwrap();
        assert!(ledger.has_voted(&voter(1), ProposalId::new(1)));
        assert!(ledger.has_voted(&voter(1), ProposalId::new(2)));
        assert!(!ledger.has_voted(&voter(2), ProposalId::new(1)));
    }

    #[test]
    fn votes_for_proposal_filters_by_id() {
        let mut ledger = VoteLedger::new();
        for seed in [3, 1, 2] {
            ledger
                .record(voter(seed), ProposalId::new(5), record(VoteChoice::For, 1))
                .unwrap();
        }
        ledger
            .record(voter(9), ProposalId::new(6), record(VoteChoice::For, 1))
            .unwrap();

        let voters: Vec<Identity> = ledger
            .votes_for_proposal(ProposalId::new(5))
            .map(|(v, _)| *v)
            .collect();
        assert_eq!(voters, vec![voter(1), voter(2), voter(3)]);
        assert_eq!(ledger.votes_for_proposal(ProposalId::new(7)).count(), 0);
    }

    #[test]
    fn choice_from_support() {
        assert!(VoteChoice::from_support(true).is_for());
        assert!(!VoteChoice::from_support(false).is_for());
    }
}
