//! Everything the engine mutates, grouped so it can be snapshotted as a unit.

use crate::error::SnapshotError;
use crate::event::DaoEvent;
use crate::ledger::VoteLedger;
use crate::store::ProposalStore;
use serde::{Deserialize, Serialize};
use vdao_types::TokenAmount;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GovernanceState {
    pub(crate) proposals: ProposalStore,
    pub(crate) votes: VoteLedger,
    /// Native asset held by the treasury.
    pub(crate) treasury: TokenAmount,
    /// Not persisted; drained by the caller.
    #[serde(skip)]
    pub(crate) events: Vec<DaoEvent>,
}

impl GovernanceState {
    pub fn proposals(&self) -> &ProposalStore {
        &self.proposals
    }

    pub fn votes(&self) -> &VoteLedger {
        &self.votes
    }

    pub fn treasury(&self) -> TokenAmount {
        self.treasury
    }

    /// Serialize the durable part of the state (proposals, votes, treasury).
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, SnapshotError> {
        bincode::deserialize(data).map_err(|e| SnapshotError::Decode(e.to_string()))
    }
}
