//! Withdrawal proposals and their lifecycle.

use serde::{Deserialize, Serialize};
use vdao_types::{GovernanceParams, Identity, ProposalId, Timestamp, TokenAmount};

/// Where a proposal stands, evaluated lazily against the clock.
///
/// `Open` → `Passed` | `Failed` | `Vetoed`, and `Passed` → `Executed`.
/// Nothing is stored: the status is derived from the record and the current time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Inside the voting window.
    Open,
    /// Window closed with majority and quorum; awaiting `execute`.
    Passed,
    /// Window closed without majority or quorum.
    Failed,
    /// Blocked permanently by an admin or veto holder.
    Vetoed,
    /// Funds paid out.
    Executed,
}

/// A request to pay `amount` of the treasury's native asset to `recipient`.
///
/// Records are never deleted. The identity fields and `amount` are fixed at
/// creation; only the tallies and flags change afterwards, through the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    id: ProposalId,
    proposer: Identity,
    recipient: Identity,
    amount: TokenAmount,
    created_at: Timestamp,
    votes_for: TokenAmount,
    votes_against: TokenAmount,
    finalized: bool,
    vetoed: bool,
    executed: bool,
}

impl Proposal {
    pub fn new(
        id: ProposalId,
        proposer: Identity,
        recipient: Identity,
        amount: TokenAmount,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            proposer,
            recipient,
            amount,
            created_at,
            ..Default::default()
        }
    }

    pub fn id(&self) -> ProposalId {
        self.id
    }

    pub fn proposer(&self) -> Identity {
        self.proposer
    }

    pub fn recipient(&self) -> Identity {
        self.recipient
    }

    pub fn amount(&self) -> TokenAmount {
        self.amount
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn votes_for(&self) -> TokenAmount {
        self.votes_for
    }

    pub fn votes_against(&self) -> TokenAmount {
        self.votes_against
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn is_vetoed(&self) -> bool {
        self.vetoed
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// The last second at which votes are still accepted.
    pub fn voting_closes_at(&self, window_secs: u64) -> Timestamp {
        Timestamp::new(self.created_at.as_secs().saturating_add(window_secs))
    }

    /// True once strictly more than `window_secs` have elapsed since creation.
    pub fn voting_window_closed(&self, now: Timestamp, window_secs: u64) -> bool {
        self.created_at.has_expired(window_secs, now)
    }

    /// Majority and absolute quorum, ignoring time and flags.
    pub fn carries(&self, quorum: TokenAmount) -> bool {
        self.votes_for > self.votes_against && self.votes_for >= quorum
    }

    pub fn status(&self, now: Timestamp, params: &GovernanceParams) -> ProposalStatus {
        if self.executed {
            ProposalStatus::Executed
        } else if self.vetoed {
            ProposalStatus::Vetoed
        } else if !self.voting_window_closed(now, params.voting_window_secs) {
            ProposalStatus::Open
        } else if self.carries(params.quorum) {
            ProposalStatus::Passed
        } else {
            ProposalStatus::Failed
        }
    }

    // Tallies saturate: live balances can be counted more than once.
    pub(crate) fn add_weight(&mut self, support: bool, weight: TokenAmount) {
        if support {
            self.votes_for = self.votes_for.saturating_add(weight);
        } else {
            self.votes_against = self.votes_against.saturating_add(weight);
        }
    }

    pub(crate) fn mark_executed(&mut self) {
        self.finalized = true;
        self.executed = true;
    }

    /// Back out of [`mark_executed`](Self::mark_executed) when the payout fails.
    pub(crate) fn clear_executed(&mut self) {
        self.finalized = false;
        self.executed = false;
    }

    pub(crate) fn mark_vetoed(&mut self) {
        self.vetoed = true;
    }
}
