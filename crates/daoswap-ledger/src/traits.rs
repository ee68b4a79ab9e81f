//! Interfaces the registry calls into.

use chrono::{DateTime, Utc};
use daoswap_types::{Address, Claim, ClaimId, Result};
use rust_decimal::Decimal;

/// A multi-token, ERC20-style ledger.
///
/// Every method fails with `UnknownToken` for a token the ledger does not
/// carry.
pub trait TokenLedger {
    fn balance_of(&self, token: Address, account: Address) -> Result<Decimal>;

    /// How much `spender` may still move out of `owner`'s balance.
    fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<Decimal>;

    /// Set (not add to) `spender`'s allowance over `owner`'s balance.
    fn approve(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: Decimal,
    ) -> Result<()>;

    /// Move `amount` from `from` to `to` on `from`'s own authority.
    ///
    /// # Errors
    /// `InsufficientFunds` if `from` holds less than `amount`.
    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<()>;

    /// Move `amount` from `from` to `to` on `spender`'s allowance, consuming it.
    ///
    /// # Errors
    /// `InsufficientFunds` if `from` holds less than `amount` (checked first),
    /// `InsufficientAllowance` if `spender` is not authorized for `amount`.
    fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Decimal,
    ) -> Result<()>;
}

/// A service that mints time-locked claims.
///
/// The caller forwards the backing tokens into [`custody_account`] before
/// calling [`issue_claim`]; issuers may refuse claims their custody does not
/// cover.
///
/// [`custody_account`]: ClaimIssuer::custody_account
/// [`issue_claim`]: ClaimIssuer::issue_claim
pub trait ClaimIssuer {
    /// The ledger account holding tokens that back outstanding claims.
    fn custody_account(&self) -> Address;

    /// Mint one claim entitling `holder` to `amount` of `token` from
    /// `unlock_date` on.
    fn issue_claim<L: TokenLedger>(
        &mut self,
        ledger: &L,
        holder: Address,
        token: Address,
        amount: Decimal,
        unlock_date: DateTime<Utc>,
        issued_at: DateTime<Utc>,
    ) -> Result<ClaimId>;

    fn claim(&self, id: ClaimId) -> Option<&Claim>;

    /// Claims held by `holder`, in issuance order.
    fn claims_of(&self, holder: Address) -> Vec<&Claim>;

    /// Number of claims held by `holder`.
    fn balance_of(&self, holder: Address) -> usize {
        self.claims_of(holder).len()
    }
}

/// Savepoint / rollback over a collaborator's state.
pub trait Transactional {
    type Savepoint;

    fn savepoint(&self) -> Self::Savepoint;

    /// Restore the state captured by `savepoint`, discarding every change
    /// made since.
    fn rollback_to(&mut self, savepoint: Self::Savepoint);
}
