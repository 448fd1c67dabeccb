//! Events emitted by the engine, in call order.

use serde::{Deserialize, Serialize};
use vdao_types::{Identity, ProposalId, TokenAmount};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DaoEvent {
    /// Native asset received by the treasury.
    Deposited { from: Identity, amount: TokenAmount },
    ProposalCreated {
        id: ProposalId,
        proposer: Identity,
        recipient: Identity,
        amount: TokenAmount,
    },
    VoteCast {
        id: ProposalId,
        voter: Identity,
        support: bool,
        weight: TokenAmount,
    },
    Executed {
        id: ProposalId,
        recipient: Identity,
        amount: TokenAmount,
    },
    Vetoed { id: ProposalId, by: Identity },
}
