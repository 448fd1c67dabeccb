//! Treasury governance for the vdao engine.
//!
//! Lifecycle: a caller opens a withdrawal proposal → token holders vote, weighted by
//! their live balance, during a fixed window → once the window has closed and the
//! proposal carries quorum and majority, `execute` pays the recipient exactly once.
//! Admins and veto holders can block a proposal permanently at any point before
//! execution.
//!
//! Every call runs to completion before the next one; the only re-entry point is
//! the payout, which hands the engine back to recipient code. All effects are
//! committed before the payout and rolled back if it fails.

pub mod engine;
pub mod error;
pub mod event;
pub mod execution;
pub mod ledger;
pub mod proposal;
pub mod state;
pub mod store;
pub mod veto;
pub mod voting;

pub use engine::Dao;
pub use error::{
    CreateError, ErrorKind, ExecError, PayoutError, SnapshotError, StoreError, TreasuryError,
    VetoError, VoteError,
};
pub use event::DaoEvent;
pub use execution::{ExecutionEngine, ExecutionGuard, NativeLedger, Payout, Receipt};
pub use ledger::{VoteChoice, VoteLedger, VoteRecord};
pub use proposal::{Proposal, ProposalStatus};
pub use state::GovernanceState;
pub use store::ProposalStore;
pub use veto::VetoGate;
pub use voting::VotingEngine;
