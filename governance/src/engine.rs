//! The governance engine: one owned state, three borrowed oracles and the
//! public entry points.

use crate::error::{
    CreateError, ExecError, SnapshotError, StoreError, TreasuryError, VetoError, VoteError,
};
use crate::event::DaoEvent;
use crate::execution::{ExecutionEngine, ExecutionGuard, Payout, Receipt};
use crate::ledger::VoteRecord;
use crate::proposal::{Proposal, ProposalStatus};
use crate::state::GovernanceState;
use crate::veto::VetoGate;
use crate::voting::VotingEngine;
use vdao_oracle::Environment;
use vdao_types::{GovernanceParams, Identity, ProposalId, ProposerPolicy, TokenAmount};

/// A treasury DAO: withdrawal proposals, weighted votes, veto and execution.
///
/// Every method runs to completion and either commits all of its changes or
/// none of them.
pub struct Dao<'env> {
    params: GovernanceParams,
    env: Environment<'env>,
    state: GovernanceState,
    guard: ExecutionGuard,
    voting: VotingEngine,
    execution: ExecutionEngine,
    veto_gate: VetoGate,
}

impl<'env> Dao<'env> {
    pub fn new(params: GovernanceParams, env: Environment<'env>) -> Self {
        Self::with_state(params, env, GovernanceState::default())
    }

    pub fn with_state(
        params: GovernanceParams,
        env: Environment<'env>,
        state: GovernanceState,
    ) -> Self {
        Self {
            params,
            env,
            state,
            guard: ExecutionGuard::default(),
            voting: VotingEngine,
            execution: ExecutionEngine,
            veto_gate: VetoGate,
        }
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    pub fn state(&self) -> &GovernanceState {
        &self.state
    }

    // ── Treasury ────────────────────────────────────────────────────────

    /// Passive reception of the native asset. Returns the new treasury balance.
    pub fn receive(
        &mut self,
        from: Identity,
        amount: TokenAmount,
    ) -> Result<TokenAmount, TreasuryError> {
        let balance = self
            .state
            .treasury
            .checked_add(amount)
            .ok_or(TreasuryError::Overflow {
                balance: self.state.treasury,
                deposit: amount,
            })?;
        self.state.treasury = balance;
        self.state.events.push(DaoEvent::Deposited { from, amount });
        tracing::info!(from = %from, amount = %amount, treasury = %balance, "treasury funded");
        Ok(balance)
    }

    pub fn treasury_balance(&self) -> TokenAmount {
        self.state.treasury
    }

    // ── Proposals ───────────────────────────────────────────────────────

    /// Open a proposal to pay `amount` to `recipient`. `id` is chosen by the caller.
    pub fn withdraw_eth(
        &mut self,
        id: ProposalId,
        proposer: Identity,
        recipient: Identity,
        amount: TokenAmount,
    ) -> Result<(), CreateError> {
        if self.params.proposer_policy == ProposerPolicy::TokenHolders
            && self.env.balances.balance_of(&proposer).is_zero()
        {
            return Err(CreateError::Unauthorized(proposer));
        }

        let now = self.env.clock.now();
        self.state
            .proposals
            .create(Proposal::new(id, proposer, recipient, amount, now))
            .map_err(|StoreError::AlreadyExists(id)| CreateError::AlreadyExists(id))?;
        self.state.events.push(DaoEvent::ProposalCreated {
            id,
            proposer,
            recipient,
            amount,
        });
        tracing::info!(
            proposal = %id,
            proposer = %proposer,
            recipient = %recipient,
            amount = %amount,
            created_at = %now,
            "proposal created"
        );
        Ok(())
    }

    /// Full record for `id`, or an all-zero default if there is none.
    pub fn proposals(&self, id: ProposalId) -> Proposal {
        self.state.proposals.get(id).cloned().unwrap_or_default()
    }

    pub fn proposal(&self, id: ProposalId) -> Option<&Proposal> {
        self.state.proposals.get(id)
    }

    pub fn status(&self, id: ProposalId) -> Option<ProposalStatus> {
        let now = self.env.clock.now();
        self.state
            .proposals
            .get(id)
            .map(|p| p.status(now, &self.params))
    }

    // ── Voting ──────────────────────────────────────────────────────────

    pub fn vote(
        &mut self,
        id: ProposalId,
        support: bool,
        voter: Identity,
    ) -> Result<VoteRecord, VoteError> {
        let now = self.env.clock.now();
        let record = self.voting.cast_vote(
            &mut self.state,
            &self.params,
            self.env.balances,
            now,
            id,
            voter,
            support,
        )?;
        self.state.events.push(DaoEvent::VoteCast {
            id,
            voter,
            support,
            weight: record.weight,
        });
        Ok(record)
    }

    pub fn voted(&self, voter: &Identity, id: ProposalId) -> Option<&VoteRecord> {
        self.state.votes.get(voter, id)
    }

    // ── Veto ────────────────────────────────────────────────────────────

    pub fn veto(&mut self, id: ProposalId, caller: Identity) -> Result<(), VetoError> {
        self.veto_gate.veto(&mut self.state, self.env.access, id, caller)?;
        self.state.events.push(DaoEvent::Vetoed { id, by: caller });
        tracing::info!(proposal = %id, by = %caller, "proposal vetoed");
        Ok(())
    }

    // ── Execution ───────────────────────────────────────────────────────

    /// Pay out a passed proposal through `payout`, exactly once.
    ///
    /// The proposal is marked executed and the treasury debited before
    /// `payout` runs. If `payout` fails, this call's own effects are reverted.
    /// Anything a nested call committed while `payout` ran stays committed,
    /// since its transfer has already happened.
    pub fn execute(
        &mut self,
        id: ProposalId,
        payout: &mut dyn Payout,
    ) -> Result<Receipt, ExecError> {
        let now = self.env.clock.now();
        let proposal = self
            .state
            .proposals
            .get(id)
            .ok_or(ExecError::ProposalNotFound(id))?;
        if let Err(e) = self.execution.preflight(proposal, &self.params, now) {
            tracing::warn!(proposal = %id, error = %e, "execution rejected");
            return Err(e);
        }
        if self.guard.is_active(id) {
            tracing::warn!(proposal = %id, "re-entrant execution blocked");
            return Err(ExecError::ExecutionInProgress(id));
        }

        let (recipient, amount) = self.execution.commit(&mut self.state, id)?;
        self.state.events.push(DaoEvent::Executed {
            id,
            recipient,
            amount,
        });

        self.guard.enter(id);
        let paid = payout.pay(self, &recipient, amount);
        self.guard.exit(id);

        match paid {
            Ok(()) => {
                tracing::info!(
                    proposal = %id,
                    recipient = %recipient,
                    amount = %amount,
                    treasury = %self.state.treasury,
                    "proposal executed"
                );
                Ok(Receipt {
                    id,
                    recipient,
                    amount,
                    executed_at: now,
                })
            }
            Err(source) => {
                tracing::warn!(proposal = %id, error = %source, "payout failed, reverting");
                self.execution.revert(&mut self.state, id, amount);
                Err(ExecError::TransferFailed { id, source })
            }
        }
    }

    // ── Events & snapshots ──────────────────────────────────────────────

    pub fn events(&self) -> &[DaoEvent] {
        &self.state.events
    }

    /// Take all queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<DaoEvent> {
        std::mem::take(&mut self.state.events)
    }

    /// Serialize proposals, votes and the treasury balance.
    pub fn save_state(&self) -> Result<Vec<u8>, SnapshotError> {
        self.state.to_bytes()
    }

    /// Rebuild an engine from [`Dao::save_state`] output.
    pub fn load_state(
        data: &[u8],
        params: GovernanceParams,
        env: Environment<'env>,
    ) -> Result<Self, SnapshotError> {
        let state = GovernanceState::from_bytes(data)?;
        tracing::info!(proposals = state.proposals.len(), "governance state restored");
        Ok(Self::with_state(params, env, state))
    }
}
