//! Scenario replay: a JSON list of calls run against a fresh engine wired to
//! in-memory oracles.
//!
//! Rejected calls do not stop the replay. Each step's outcome is recorded and
//! the report ends with the final proposals, treasury and recipient balances.

use serde::{Deserialize, Serialize};

use vdao_governance::{
    Dao, DaoEvent, ErrorKind, NativeLedger, Proposal, ProposalStatus, TreasuryError,
};
use vdao_nullables::{NullAccess, NullClock, NullToken, TokenHolding};
use vdao_oracle::{Clock, Environment};
use vdao_types::amount::decimal;
use vdao_types::{Identity, ProposalId, Timestamp, TokenAmount};

use crate::config::DaoConfig;

/// Clock reading at the first step unless the scenario sets `start_time`.
pub const DEFAULT_START_TIME: u64 = 1_700_000_000;

#[derive(Clone, Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub start_time: Option<u64>,
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Send native asset to the treasury.
    Fund {
        from: Identity,
        #[serde(with = "decimal")]
        amount: TokenAmount,
    },
    /// Overwrite a governance-token balance.
    SetBalance {
        holder: Identity,
        #[serde(with = "decimal")]
        amount: TokenAmount,
    },
    /// Move governance tokens between holders.
    Transfer {
        from: Identity,
        to: Identity,
        #[serde(with = "decimal")]
        amount: TokenAmount,
    },
    GrantAdmin { who: Identity },
    GrantVeto { who: Identity },
    Propose {
        id: ProposalId,
        proposer: Identity,
        recipient: Identity,
        #[serde(with = "decimal")]
        amount: TokenAmount,
    },
    Vote {
        id: ProposalId,
        voter: Identity,
        support: bool,
    },
    /// Move the clock forward.
    Advance { secs: u64 },
    Execute { id: ProposalId },
    Veto { id: ProposalId, caller: Identity },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Fund { .. } => "fund",
            Step::SetBalance { .. } => "set_balance",
            Step::Transfer { .. } => "transfer",
            Step::GrantAdmin { .. } => "grant_admin",
            Step::GrantVeto { .. } => "grant_veto",
            Step::Propose { .. } => "propose",
            Step::Vote { .. } => "vote",
            Step::Advance { .. } => "advance",
            Step::Execute { .. } => "execute",
            Step::Veto { .. } => "veto",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub step: &'static str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl StepOutcome {
    fn ok(index: usize, step: &'static str) -> Self {
        Self {
            index,
            step,
            ok: true,
            error: None,
            kind: None,
            retryable: None,
        }
    }

    fn rejected(index: usize, step: &'static str, error: impl ToString, kind: ErrorKind) -> Self {
        Self {
            index,
            step,
            ok: false,
            error: Some(error.to_string()),
            kind: Some(format!("{kind:?}")),
            retryable: Some(kind.is_retryable()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProposalView {
    pub id: ProposalId,
    pub status: ProposalStatus,
    pub proposer: Identity,
    pub recipient: Identity,
    #[serde(with = "decimal")]
    pub amount: TokenAmount,
    #[serde(with = "decimal")]
    pub votes_for: TokenAmount,
    #[serde(with = "decimal")]
    pub votes_against: TokenAmount,
    pub created_at: Timestamp,
}

impl ProposalView {
    fn new(proposal: &Proposal, status: ProposalStatus) -> Self {
        Self {
            id: proposal.id(),
            status,
            proposer: proposal.proposer(),
            recipient: proposal.recipient(),
            amount: proposal.amount(),
            votes_for: proposal.votes_for(),
            votes_against: proposal.votes_against(),
            created_at: proposal.created_at(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Payment {
    pub recipient: Identity,
    #[serde(with = "decimal")]
    pub amount: TokenAmount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
    pub outcomes: Vec<StepOutcome>,
    pub events: Vec<DaoEvent>,
    pub proposals: Vec<ProposalView>,
    #[serde(with = "decimal")]
    pub treasury: TokenAmount,
    pub payments: Vec<Payment>,
    /// Governance-token balances at the end of the replay.
    pub holdings: Vec<TokenHolding>,
}

impl Report {
    pub fn rejected(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.ok).count()
    }
}

/// Replay `scenario` against a fresh engine configured by `config`.
///
/// Only seeding the treasury can fail the whole replay; rejected steps are
/// reported in [`Report::outcomes`].
pub fn run(scenario: &Scenario, config: &DaoConfig) -> Result<Report, TreasuryError> {
    let clock = NullClock::new(scenario.start_time.unwrap_or(DEFAULT_START_TIME));
    let token = NullToken::new();
    let access = NullAccess::new();
    let mut dao = Dao::new(
        config.params.clone(),
        Environment::new(&clock, &token, &access),
    );
    let mut chain = NativeLedger::new();
    let mut outcomes = Vec::with_capacity(scenario.steps.len());

    if !config.treasury_seed.is_zero() {
        dao.receive(Identity::ZERO, config.treasury_seed)?;
    }

    for (index, step) in scenario.steps.iter().enumerate() {
        let name = step.name();
        let outcome = match step {
            Step::Fund { from, amount } => match dao.receive(*from, *amount) {
                Ok(_) => StepOutcome::ok(index, name),
                Err(e) => StepOutcome::rejected(index, name, &e, e.kind()),
            },
            Step::SetBalance { holder, amount } => {
                token.set_balance(holder, *amount);
                StepOutcome::ok(index, name)
            }
            Step::Transfer { from, to, amount } => {
                if token.transfer(from, to, *amount) {
                    StepOutcome::ok(index, name)
                } else {
                    StepOutcome::rejected(
                        index,
                        name,
                        format!("{from} holds less than {amount}"),
                        ErrorKind::ThresholdFailure,
                    )
                }
            }
            Step::GrantAdmin { who } => {
                access.grant_admin(who);
                StepOutcome::ok(index, name)
            }
            Step::GrantVeto { who } => {
                access.grant_veto(who);
                StepOutcome::ok(index, name)
            }
            Step::Propose {
                id,
                proposer,
                recipient,
                amount,
            } => match dao.withdraw_eth(*id, *proposer, *recipient, *amount) {
                Ok(()) => StepOutcome::ok(index, name),
                Err(e) => StepOutcome::rejected(index, name, &e, e.kind()),
            },
            Step::Vote { id, voter, support } => match dao.vote(*id, *support, *voter) {
                Ok(_) => StepOutcome::ok(index, name),
                Err(e) => StepOutcome::rejected(index, name, &e, e.kind()),
            },
            Step::Advance { secs } => {
                clock.advance(*secs);
                StepOutcome::ok(index, name)
            }
            Step::Execute { id } => match dao.execute(*id, &mut chain) {
                Ok(_) => StepOutcome::ok(index, name),
                Err(e) => StepOutcome::rejected(index, name, &e, e.kind()),
            },
            Step::Veto { id, caller } => match dao.veto(*id, *caller) {
                Ok(()) => StepOutcome::ok(index, name),
                Err(e) => StepOutcome::rejected(index, name, &e, e.kind()),
            },
        };
        if !outcome.ok {
            tracing::debug!(step = index, kind = name, error = ?outcome.error, "step rejected");
        }
        outcomes.push(outcome);
    }

    let now = clock.now();
    let proposals = dao
        .state()
        .proposals()
        .iter()
        .map(|p| ProposalView::new(p, p.status(now, dao.params())))
        .collect();

    Ok(Report {
        outcomes,
        events: dao.drain_events(),
        proposals,
        treasury: dao.treasury_balance(),
        payments: chain
            .iter()
            .map(|(recipient, amount)| Payment {
                recipient: *recipient,
                amount: *amount,
            })
            .collect(),
        holdings: token.holdings(),
    })
}
