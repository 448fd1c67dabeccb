//! Governance parameters fixed at deployment.
//!
//! None of these are hardcoded in the engine; every deployment supplies its own
//! (usually through the `[params]` table of the TOML config).

use crate::amount::{decimal, TokenAmount};
use crate::TypesError;
use serde::{Deserialize, Serialize};

/// Who may open a withdrawal proposal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposerPolicy {
    /// Any authenticated caller.
    #[default]
    Anyone,
    /// Only callers holding a non-zero governance-token balance.
    TokenHolders,
}

/// Deployment-time configuration of the governance engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Length of the voting window in seconds, measured from proposal creation.
    /// Votes are accepted while `elapsed <= voting_window_secs`; execution only
    /// once `elapsed > voting_window_secs`.
    #[serde(default = "default_voting_window_secs")]
    pub voting_window_secs: u64,

    /// Absolute weighted total of `for` votes a proposal must reach.
    #[serde(default = "default_quorum", with = "decimal")]
    pub quorum: TokenAmount,

    /// Smallest non-zero balance that may cast a vote.
    #[serde(default = "default_min_vote_balance", with = "decimal")]
    pub min_vote_balance: TokenAmount,

    /// Who may create proposals.
    #[serde(default)]
    pub proposer_policy: ProposerPolicy,
}

fn default_voting_window_secs() -> u64 {
    3 * 24 * 3600 // 3 days
}

fn default_quorum() -> TokenAmount {
    TokenAmount::new(50_000_000)
}

fn default_min_vote_balance() -> TokenAmount {
    TokenAmount::new(1)
}

impl GovernanceParams {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.voting_window_secs == 0 {
            return Err(TypesError::InvalidParam {
                name: "voting_window_secs",
                reason: "must be greater than zero".into(),
            });
        }
        if self.quorum.is_zero() {
            return Err(TypesError::InvalidParam {
                name: "quorum",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            voting_window_secs: default_voting_window_secs(),
            quorum: default_quorum(),
            min_vote_balance: default_min_vote_balance(),
            proposer_policy: ProposerPolicy::default(),
        }
    }
}
