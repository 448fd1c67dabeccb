//! Nullable governance token: an in-memory balance table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use vdao_oracle::BalanceOracle;
use vdao_types::{Identity, TokenAmount};

/// Governance token balances, adjustable while the engine reads them.
pub struct NullToken {
    balances: Mutex<BTreeMap<Identity, TokenAmount>>,
}

/// Serializable view of every non-zero balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHolding {
    pub holder: Identity,
    #[serde(with = "vdao_types::amount::decimal")]
    pub balance: TokenAmount,
}

impl NullToken {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(BTreeMap::new()),
        }
    }

    /// Overwrite a balance.
    pub fn set_balance(&self, holder: &Identity, amount: TokenAmount) {
        let mut balances = self.balances.lock().unwrap();
        if amount.is_zero() {
            balances.remove(holder);
        } else {
            balances.insert(*holder, amount);
        }
    }

    /// Add to a balance, saturating.
    pub fn mint(&self, holder: &Identity, amount: TokenAmount) {
        let current = self.balance_of(holder);
        self.set_balance(holder, current.saturating_add(amount));
    }

    /// Move tokens between holders. Returns false, changing nothing, if `from`
    /// holds less than `amount`.
    pub fn transfer(&self, from: &Identity, to: &Identity, amount: TokenAmount) -> bool {
        let from_balance = self.balance_of(from);
        let Some(remaining) = from_balance.checked_sub(amount) else {
            return false;
        };
        self.set_balance(from, remaining);
        self.mint(to, amount);
        true
    }

    pub fn total_supply(&self) -> TokenAmount {
        self.balances
            .lock()
            .unwrap()
            .values()
            .fold(TokenAmount::ZERO, |acc, b| acc.saturating_add(*b))
    }

    pub fn holdings(&self) -> Vec<TokenHolding> {
        self.balances
            .lock()
            .unwrap()
            .iter()
            .map(|(holder, balance)| TokenHolding {
                holder: *holder,
                balance: *balance,
            })
            .collect()
    }
}

impl Default for NullToken {
    fn default() -> Self {
        Self::new()
    }
}

impl BalanceOracle for NullToken {
    fn balance_of(&self, holder: &Identity) -> TokenAmount {
        self.balances
            .lock()
            .unwrap()
            .get(holder)
            .copied()
            .unwrap_or_default()
    }
}
