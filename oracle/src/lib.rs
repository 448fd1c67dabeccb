//! Abstract traits for the external collaborators of the governance engine.
//!
//! The engine never produces time, balances or roles itself. Every deployment
//! (a chain adapter, or the in-memory nullables for testing) implements these
//! traits, and the engine depends only on the traits.

pub mod access;
pub mod balance;
pub mod clock;

pub use access::AccessRegistry;
pub use balance::BalanceOracle;
pub use clock::Clock;

/// Borrowed handles to the three oracles, passed to the engine at construction.
#[derive(Clone, Copy)]
pub struct Environment<'a> {
    pub clock: &'a dyn Clock,
    pub balances: &'a dyn BalanceOracle,
    pub access: &'a dyn AccessRegistry,
}

impl<'a> Environment<'a> {
    pub fn new(
        clock: &'a dyn Clock,
        balances: &'a dyn BalanceOracle,
        access: &'a dyn AccessRegistry,
    ) -> Self {
        Self {
            clock,
            balances,
            access,
        }
    }
}
