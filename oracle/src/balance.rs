//! Governance-token balance oracle.

use vdao_types::{Identity, TokenAmount};

/// Reports an identity's governance-token balance.
///
/// This is the live balance at call time, not a historical snapshot.
pub trait BalanceOracle {
    fn balance_of(&self, holder: &Identity) -> TokenAmount;
}
