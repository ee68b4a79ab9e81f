//! Settlement legs for an executed swap.
//!
//! Both strategies start by pulling the executor's `token_b` leg into
//! custody. They differ only in where the two legs end up:
//! 1. **Direct**: `token_a` → executor, `token_b` → initiator
//! 2. **Deferred**: both legs → issuer custody, then one claim per party
//!
//! Functions here perform the ledger and issuer calls in order and stop at
//! the first failure. Undoing the calls that already went through is the
//! job of [`atomically`].

use chrono::{DateTime, Utc};
use daoswap_ledger::{ClaimIssuer, TokenLedger, Transactional};
use daoswap_types::{Address, Result, Settlement, Swap};

/// Run `op` against `state`, restoring its savepoint if `op` fails.
pub fn atomically<S, T>(state: &mut S, op: impl FnOnce(&mut S) -> Result<T>) -> Result<T>
where
    S: Transactional,
{
    let savepoint = state.savepoint();
    match op(state) {
        Ok(value) => Ok(value),
        Err(err) => {
            state.rollback_to(savepoint);
            Err(err)
        }
    }
}

/// Pull `amount_b` of `token_b` from the executor into custody.
fn pull_counter_leg<L: TokenLedger>(ledger: &mut L, swap: &Swap, custody: Address) -> Result<()> {
    ledger.transfer_from(
        swap.token_b,
        custody,
        swap.executor,
        custody,
        swap.amount_b,
    )
}

/// Immediate bilateral transfer.
pub fn direct<L: TokenLedger>(ledger: &mut L, swap: &Swap, custody: Address) -> Result<Settlement> {
    pull_counter_leg(ledger, swap, custody)?;
    ledger.transfer(swap.token_a, custody, swap.executor, swap.amount_a)?;
    ledger.transfer(swap.token_b, custody, swap.initiator, swap.amount_b)?;

    tracing::debug!(
        swap = %swap.id,
        executor = %swap.executor,
        initiator = %swap.initiator,
        "Direct transfer legs complete"
    );
    Ok(Settlement::DirectTransfer)
}

/// Forward both legs into the issuer's custody and mint one claim each,
/// both unlocking at `swap.unlock_date`.
pub fn deferred<L, C>(
    ledger: &mut L,
    issuer: &mut C,
    swap: &Swap,
    custody: Address,
    now: DateTime<Utc>,
) -> Result<Settlement>
where
    L: TokenLedger,
    C: ClaimIssuer,
{
    pull_counter_leg(ledger, swap, custody)?;
    let vault = issuer.custody_account();

    // Executor's entitlement: token_a
    ledger.transfer(swap.token_a, custody, vault, swap.amount_a)?;
    let executor_claim = issuer.issue_claim(
        &*ledger,
        swap.executor,
        swap.token_a,
        swap.amount_a,
        swap.unlock_date,
        now,
    )?;

    // Initiator's entitlement: token_b
    ledger.transfer(swap.token_b, custody, vault, swap.amount_b)?;
    let initiator_claim = issuer.issue_claim(
        &*ledger,
        swap.initiator,
        swap.token_b,
        swap.amount_b,
        swap.unlock_date,
        now,
    )?;

    tracing::debug!(
        swap = %swap.id,
        issuer = %vault,
        executor_claim = %executor_claim,
        initiator_claim = %initiator_claim,
        "Deferred claims issued"
    );
    Ok(Settlement::DeferredClaim {
        executor_claim,
        initiator_claim,
    })
}
