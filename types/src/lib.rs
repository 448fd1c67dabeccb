//! Fundamental types for the vdao governance engine.
//!
//! This crate defines the value types shared by every other crate in the workspace:
//! identities, proposal ids, token amounts, timestamps and the governance parameters.

pub mod amount;
pub mod error;
pub mod identity;
pub mod params;
pub mod proposal_id;
pub mod time;

pub use amount::{TokenAmount, WEI_PER_UNIT};
pub use error::TypesError;
pub use identity::Identity;
pub use params::{GovernanceParams, ProposerPolicy};
pub use proposal_id::ProposalId;
pub use time::Timestamp;
