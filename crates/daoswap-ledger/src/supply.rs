//! Supply conservation invariant checker.
//!
//! Invariant enforced by the in-memory ledger after every operation:
//! ```text
//! ∀ token: Σ balances == Σ minted
//! ```
//!
//! Escrow, settlement, and claim backing only move tokens between accounts.
//! If this ever breaks, custody accounting is wrong.

use std::collections::HashMap;

use daoswap_types::{Address, Result, SwapError};
use rust_decimal::Decimal;

/// Tracks minted supply per token and validates conservation.
#[derive(Debug, Clone, Default)]
pub struct SupplyAudit {
    /// Total minted per token since genesis.
    minted: HashMap<Address, Decimal>,
}

impl SupplyAudit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_mint(&mut self, token: Address, amount: Decimal) {
        *self.minted.entry(token).or_insert(Decimal::ZERO) += amount;
    }

    /// Expected total supply for a token.
    #[must_use]
    pub fn expected_supply(&self, token: Address) -> Decimal {
        self.minted.get(&token).copied().unwrap_or(Decimal::ZERO)
    }

    /// Whether any supply of `token` was ever minted.
    #[must_use]
    pub fn is_tracked(&self, token: Address) -> bool {
        self.minted.contains_key(&token)
    }

    /// # Errors
    /// Returns [`SwapError::SupplyInvariantViolation`] if `actual_supply`
    /// differs from the minted total.
    pub fn verify(&self, token: Address, actual_supply: Decimal) -> Result<()> {
        let expected = self.expected_supply(token);
        if actual_supply != expected {
            return Err(SwapError::SupplyInvariantViolation {
                reason: format!(
                    "Token {token}: actual supply {actual_supply} != minted {expected}"
                ),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn tracked_tokens(&self) -> Vec<Address> {
        let mut tokens: Vec<Address> = self.minted.keys().copied().collect();
        tokens.sort();
        tokens
    }
}
