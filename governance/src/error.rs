use thiserror::Error;
use vdao_types::{Identity, ProposalId, Timestamp, TokenAmount};

/// Coarse classification of every rejection, so callers can decide whether a
/// later retry can possibly succeed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The referenced proposal does not exist.
    NotFound,
    /// The proposal or vote is already in a state that forbids the call.
    StateConflict,
    /// The call came at the wrong time relative to the voting window.
    WindowViolation,
    /// The caller lacks the required capability.
    AuthorizationFailure,
    /// A weight, quorum or balance bar was not met.
    ThresholdFailure,
    /// An external collaborator (payout recipient, snapshot codec) failed.
    External,
}

impl ErrorKind {
    /// Only window violations can succeed on an identical later call.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::WindowViolation)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("proposal {0} already exists")]
    AlreadyExists(ProposalId),

}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreateError {
    #[error("proposal {0} already exists")]
    AlreadyExists(ProposalId),

    #[error("{0} may not open proposals")]
    Unauthorized(Identity),
}

impl CreateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyExists(_) => ErrorKind::StateConflict,
            Self::Unauthorized(_) => ErrorKind::AuthorizationFailure,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VoteError {
    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("voting on proposal {id} closed at {closed_at}")]
    VotingClosed { id: ProposalId, closed_at: Timestamp },

    #[error("{voter} has already voted on proposal {id}")]
    AlreadyVoted { voter: Identity, id: ProposalId },

    #[error("{0} holds no governance tokens")]
    ZeroWeight(Identity),

    #[error("balance below voting minimum: {have} < {need}")]
    BelowMinimumBalance { have: TokenAmount, need: TokenAmount },
}

impl VoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProposalNotFound(_) => ErrorKind::NotFound,
            Self::VotingClosed { .. } => ErrorKind::WindowViolation,
            Self::AlreadyVoted { .. } => ErrorKind::StateConflict,
            Self::ZeroWeight(_) | Self::BelowMinimumBalance { .. } => ErrorKind::ThresholdFailure,
        }
    }
}

/// Raised by a [`Payout`](crate::Payout) when the recipient refuses the transfer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("payout to {recipient} rejected: {reason}")]
pub struct PayoutError {
    pub recipient: Identity,
    pub reason: String,
}

impl PayoutError {
    pub fn new(recipient: Identity, reason: impl Into<String>) -> Self {
        Self {
            recipient,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecError {
    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("proposal {0} has already been executed")]
    AlreadyExecuted(ProposalId),

    #[error("proposal {0} has been vetoed")]
    Vetoed(ProposalId),

    #[error("voting on proposal {id} is open until {closes_at}")]
    VotingStillOpen { id: ProposalId, closes_at: Timestamp },

    #[error(
        "quorum not met on proposal {id}: {votes_for} for, {votes_against} against, quorum {quorum}"
    )]
    QuorumNotMet {
        id: ProposalId,
        votes_for: TokenAmount,
        votes_against: TokenAmount,
        quorum: TokenAmount,
    },

    #[error("proposal {0} is already being executed")]
    ExecutionInProgress(ProposalId),

    #[error("treasury holds {available}, proposal requests {requested}")]
    InsufficientTreasury {
        available: TokenAmount,
        requested: TokenAmount,
    },

    #[error("transfer for proposal {id} failed")]
    TransferFailed {
        id: ProposalId,
        #[source]
        source: PayoutError,
    },
}

impl ExecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProposalNotFound(_) => ErrorKind::NotFound,
            Self::AlreadyExecuted(_) | Self::Vetoed(_) | Self::ExecutionInProgress(_) => {
                ErrorKind::StateConflict
            }
            Self::VotingStillOpen { .. } => ErrorKind::WindowViolation,
            Self::QuorumNotMet { .. } | Self::InsufficientTreasury { .. } => {
                ErrorKind::ThresholdFailure
            }
            Self::TransferFailed { .. } => ErrorKind::External,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VetoError {
    #[error("{0} holds neither the admin role nor a veto credential")]
    Unauthorized(Identity),

    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("proposal {0} has already been executed")]
    AlreadyExecuted(ProposalId),

    #[error("proposal {0} is already vetoed")]
    AlreadyVetoed(ProposalId),
}

impl VetoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) => ErrorKind::AuthorizationFailure,
            Self::ProposalNotFound(_) => ErrorKind::NotFound,
            Self::AlreadyExecuted(_) | Self::AlreadyVetoed(_) => ErrorKind::StateConflict,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreasuryError {
    #[error("deposit of {deposit} would overflow treasury balance {balance}")]
    Overflow {
        balance: TokenAmount,
        deposit: TokenAmount,
    },
}

impl TreasuryError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ThresholdFailure
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {0}")]
    Encode(String),

    #[error("snapshot decoding failed: {0}")]
    Decode(String),
}
