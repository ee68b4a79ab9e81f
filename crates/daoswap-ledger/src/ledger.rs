//! In-memory multi-token ledger.
//!
//! Tracks per-(token, account) balances and per-(token, owner, spender)
//! allowances. All mutations are atomic: either the full operation succeeds
//! or the ledger is unchanged.

use std::collections::HashMap;

use daoswap_types::{Address, Result, SwapError};
use rust_decimal::Decimal;

use crate::supply::SupplyAudit;
use crate::traits::{TokenLedger, Transactional};

/// ERC20-style balances for any number of tokens.
///
/// A token comes into existence the first time it is minted. Operations on
/// a token that was never minted fail with `UnknownToken`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    /// Per-(token, account) balances.
    balances: HashMap<(Address, Address), Decimal>,
    /// Per-(token, owner, spender) allowances.
    allowances: HashMap<(Address, Address, Address), Decimal>,
    /// Minted supply, doubling as the set of known tokens.
    supply: SupplyAudit,
}

/// Captured [`InMemoryLedger`] state.
#[derive(Debug, Clone)]
pub struct LedgerSavepoint(InMemoryLedger);

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` of `token` out of thin air and credit it to `to`.
    /// Registers the token on first use.
    ///
    /// # Errors
    /// - `InvalidAsset` if `token` is the zero address
    /// - `InvalidAmount` if `amount` is negative
    pub fn mint(&mut self, token: Address, to: Address, amount: Decimal) -> Result<()> {
        if token.is_zero() {
            return Err(SwapError::InvalidAsset);
        }
        ensure_non_negative(amount)?;
        *self.balances.entry((token, to)).or_insert(Decimal::ZERO) += amount;
        self.supply.record_mint(token, amount);
        tracing::debug!(token = %token, to = %to, amount = %amount, "Minted");
        Ok(())
    }

    /// Sum of every account's balance of `token`.
    #[must_use]
    pub fn total_supply(&self, token: Address) -> Decimal {
        self.balances
            .iter()
            .filter(|((t, _), _)| *t == token)
            .map(|(_, amount)| *amount)
            .sum()
    }

    /// Verify that balances of `token` still add up to its minted supply.
    pub fn verify_supply(&self, token: Address) -> Result<()> {
        self.supply.verify(token, self.total_supply(token))
    }

    /// Verify supply conservation for every known token.
    pub fn verify_all(&self) -> Result<()> {
        self.supply
            .tracked_tokens()
            .into_iter()
            .try_for_each(|token| self.verify_supply(token))
    }

    fn ensure_known(&self, token: Address) -> Result<()> {
        if self.supply.is_tracked(token) {
            Ok(())
        } else {
            Err(SwapError::UnknownToken(token))
        }
    }

    fn balance(&self, token: Address, account: Address) -> Decimal {
        self.balances
            .get(&(token, account))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Debit `from` and credit `to`. Caller has already checked funds.
    fn move_funds(&mut self, token: Address, from: Address, to: Address, amount: Decimal) {
        *self.balances.entry((token, from)).or_insert(Decimal::ZERO) -= amount;
        *self.balances.entry((token, to)).or_insert(Decimal::ZERO) += amount;
    }

    fn ensure_funds(&self, token: Address, from: Address, amount: Decimal) -> Result<()> {
        let available = self.balance(token, from);
        if available < amount {
            return Err(SwapError::InsufficientFunds {
                token,
                needed: amount,
                available,
            });
        }
        Ok(())
    }
}

fn ensure_non_negative(amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(SwapError::InvalidAmount { amount });
    }
    Ok(())
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, token: Address, account: Address) -> Result<Decimal> {
        self.ensure_known(token)?;
        Ok(self.balance(token, account))
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<Decimal> {
        self.ensure_known(token)?;
        Ok(self
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(Decimal::ZERO))
    }

    fn approve(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: Decimal,
    ) -> Result<()> {
        self.ensure_known(token)?;
        ensure_non_negative(amount)?;
        self.allowances.insert((token, owner, spender), amount);
        Ok(())
    }

    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<()> {
        self.ensure_known(token)?;
        ensure_non_negative(amount)?;
        self.ensure_funds(token, from, amount)?;
        self.move_funds(token, from, to, amount);
        tracing::debug!(token = %token, from = %from, to = %to, amount = %amount, "Transfer");
        Ok(())
    }

    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<()> {
        self.ensure_known(token)?;
        ensure_non_negative(amount)?;
        self.ensure_funds(token, from, amount)?;

        let allowed = self.allowance(token, from, spender)?;
        if allowed < amount {
            return Err(SwapError::InsufficientAllowance {
                token,
                needed: amount,
                allowed,
            });
        }

        self.allowances.insert((token, from, spender), allowed - amount);
        self.move_funds(token, from, to, amount);
        tracing::debug!(
            token = %token,
            spender = %spender,
            from = %from,
            to = %to,
            amount = %amount,
            "TransferFrom"
        );
        Ok(())
    }
}

impl Transactional for InMemoryLedger {
    type Savepoint = LedgerSavepoint;

    /// Copies the whole ledger, so every registry transition costs
    /// O(balances + allowances). Not meant for large books.
    fn savepoint(&self) -> LedgerSavepoint {
        LedgerSavepoint(self.clone())
    }

    fn rollback_to(&mut self, savepoint: LedgerSavepoint) {
        *self = savepoint.0;
    }
}
