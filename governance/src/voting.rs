//! Voting engine: validates votes, records them in the ledger and updates tallies.

use crate::error::VoteError;
use crate::ledger::{VoteChoice, VoteRecord};
use crate::state::GovernanceState;
use vdao_oracle::BalanceOracle;
use vdao_types::{GovernanceParams, Identity, ProposalId, Timestamp};

/// Stateless vote validation and recording over a [`GovernanceState`].
#[derive(Clone, Copy, Debug, Default)]
pub struct VotingEngine;

impl VotingEngine {
    /// Cast `voter`'s vote on proposal `id`.
    ///
    /// Weight is the voter's balance as reported by `balances` right now. All
    /// checks run before anything is written, so a rejected vote leaves the
    /// tally and the ledger unchanged.
    #[allow(clippy::too_many_arguments)]
    pub fn cast_vote(
        &self,
        state: &mut GovernanceState,
        params: &GovernanceParams,
        balances: &dyn BalanceOracle,
        now: Timestamp,
        id: ProposalId,
        voter: Identity,
        support: bool,
    ) -> Result<VoteRecord, VoteError> {
        let proposal = state
            .proposals
            .get_mut(id)
            .ok_or(VoteError::ProposalNotFound(id))?;

        if proposal.voting_window_closed(now, params.voting_window_secs) {
            return Err(VoteError::VotingClosed {
                id,
                closed_at: proposal.voting_closes_at(params.voting_window_secs),
            });
        }
        if state.votes.has_voted(&voter, id) {
            return Err(VoteError::AlreadyVoted { voter, id });
        }

        let weight = balances.balance_of(&voter);
        if weight.is_zero() {
            return Err(VoteError::ZeroWeight(voter));
        }
        if weight < params.min_vote_balance {
            return Err(VoteError::BelowMinimumBalance {
                have: weight,
                need: params.min_vote_balance,
            });
        }

        let record = VoteRecord {
            choice: VoteChoice::from_support(support),
            weight,
            cast_at: now,
        };
        state.votes.record(voter, id, record)?;
        proposal.add_weight(support, weight);

        tracing::debug!(
            proposal = %id,
            voter = %voter,
            support,
            weight = %weight,
            "vote recorded"
        );
        Ok(record)
    }
}
