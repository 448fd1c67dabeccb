//! Execution engine: turns a passed proposal into exactly one transfer.
//!
//! Ordering inside [`Dao::execute`](crate::Dao::execute):
//! 1. checks ([`ExecutionEngine::preflight`], the in-progress guard, treasury cover)
//! 2. effects: `executed`/`finalized` set, treasury debited, event queued
//! 3. interaction: [`Payout::pay`], which may call back into the engine
//! 4. on payout failure, [`ExecutionEngine::revert`] undoes step 2 for this id only
//!
//! A nested `execute` of the same id during step 3 sees `executed == true` and
//! fails with `AlreadyExecuted`; the guard catches anything that slips past.
//! Nested executions of other ids pay out for real, so a failing outer payout
//! leaves them in place.

use crate::engine::Dao;
use crate::error::{ExecError, PayoutError};
use crate::event::DaoEvent;
use crate::proposal::Proposal;
use crate::state::GovernanceState;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use vdao_types::{GovernanceParams, Identity, ProposalId, Timestamp, TokenAmount};

/// The value-moving side effect of an execution.
///
/// Receives the engine itself so recipient code (a contract fallback, say) can
/// call back in before the outer `execute` returns.
pub trait Payout {
    fn pay(
        &mut self,
        dao: &mut Dao<'_>,
        recipient: &Identity,
        amount: TokenAmount,
    ) -> Result<(), PayoutError>;
}

/// Proof of a completed execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ProposalId,
    pub recipient: Identity,
    pub amount: TokenAmount,
    pub executed_at: Timestamp,
}

/// Proposal ids whose payout is currently running.
#[derive(Debug, Default)]
pub struct ExecutionGuard {
    active: HashSet<ProposalId>,
}

impl ExecutionGuard {
    /// Mark `id` as in progress. Returns false if it already was.
    pub fn enter(&mut self, id: ProposalId) -> bool {
        self.active.insert(id)
    }

    pub fn exit(&mut self, id: ProposalId) {
        self.active.remove(&id);
    }

    pub fn is_active(&self, id: ProposalId) -> bool {
        self.active.contains(&id)
    }
}

/// Stateless checks and effects for execution.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExecutionEngine;

impl ExecutionEngine {
    /// Every state and time check that does not depend on the treasury.
    pub fn preflight(
        &self,
        proposal: &Proposal,
        params: &GovernanceParams,
        now: Timestamp,
    ) -> Result<(), ExecError> {
        let id = proposal.id();
        if proposal.is_executed() {
            return Err(ExecError::AlreadyExecuted(id));
        }
        if proposal.is_vetoed() {
            return Err(ExecError::Vetoed(id));
        }
        if !proposal.voting_window_closed(now, params.voting_window_secs) {
            return Err(ExecError::VotingStillOpen {
                id,
                closes_at: proposal.voting_closes_at(params.voting_window_secs),
            });
        }
        if !proposal.carries(params.quorum) {
            return Err(ExecError::QuorumNotMet {
                id,
                votes_for: proposal.votes_for(),
                votes_against: proposal.votes_against(),
                quorum: params.quorum,
            });
        }
        Ok(())
    }

    /// Commit the execution: flags first, then the treasury debit. Returns the
    /// recipient and amount for the payout.
    pub(crate) fn commit(
        &self,
        state: &mut GovernanceState,
        id: ProposalId,
    ) -> Result<(Identity, TokenAmount), ExecError> {
        let proposal = state
            .proposals
            .get_mut(id)
            .ok_or(ExecError::ProposalNotFound(id))?;
        let (recipient, amount) = (proposal.recipient(), proposal.amount());
        let remaining =
            state
                .treasury
                .checked_sub(amount)
                .ok_or(ExecError::InsufficientTreasury {
                    available: state.treasury,
                    requested: amount,
                })?;
        proposal.mark_executed();
        state.treasury = remaining;
        Ok((recipient, amount))
    }

    /// Undo [`commit`](Self::commit) for `id` after its payout failed: clear the
    /// flags, credit `amount` back and drop the `Executed` event if it is still
    /// queued.
    pub(crate) fn revert(&self, state: &mut GovernanceState, id: ProposalId, amount: TokenAmount) {
        if let Some(proposal) = state.proposals.get_mut(id) {
            proposal.clear_executed();
        }
        state.treasury = state.treasury.saturating_add(amount);
        if let Some(pos) = state
            .events
            .iter()
            .rposition(|e| matches!(e, DaoEvent::Executed { id: executed, .. } if *executed == id))
        {
            state.events.remove(pos);
        }
    }
}

/// In-memory ledger of the native asset outside the treasury.
///
/// Credits every payout to the recipient's balance, so conservation can be
/// checked against the treasury.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NativeLedger {
    balances: BTreeMap<Identity, TokenAmount>,
}

impl NativeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, who: &Identity) -> TokenAmount {
        self.balances.get(who).copied().unwrap_or_default()
    }

    pub fn total(&self) -> TokenAmount {
        self.balances
            .values()
            .fold(TokenAmount::ZERO, |acc, b| acc.saturating_add(*b))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identity, &TokenAmount)> {
        self.balances.iter()
    }
}

impl Payout for NativeLedger {
    fn pay(
        &mut self,
        _dao: &mut Dao<'_>,
        recipient: &Identity,
        amount: TokenAmount,
    ) -> Result<(), PayoutError> {
        let balance = self.balances.entry(*recipient).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| PayoutError::new(*recipient, "recipient balance overflow"))?;
        Ok(())
    }
}
