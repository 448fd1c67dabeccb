//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! Every external collaborator of the engine (clock, governance token, access
//! registry) is abstracted behind a trait in `vdao-oracle`. This crate provides
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically through `&self`, while the engine holds them
//! - Never touch a chain, the filesystem or the network
//!
//! Usage: swap real implementations for nullables in tests and simulations.

pub mod access;
pub mod clock;
pub mod token;

pub use access::NullAccess;
pub use clock::NullClock;
pub use token::{NullToken, TokenHolding};
