//! # Swap: the escrow record
//!
//! One `Swap` governs a single bilateral exchange: the initiator escrows
//! `amount_a` of `token_a`, the executor supplies `amount_b` of `token_b`.
//!
//! ## State Machine
//!
//! ```text
//!   ┌──────┐  execute   ┌──────────┐
//!   │ OPEN ├───────────▶│ EXECUTED │
//!   └──┬───┘            └──────────┘
//!      │ cancel
//!      ▼
//!   ┌───────────┐
//!   │ CANCELLED │
//!   └───────────┘
//! ```
//!
//! Both terminal states are irreversible. Apart from `status`, a record is
//! immutable once created.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, SwapError, SwapId};

/// The lifecycle state of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapStatus {
    /// Funds of the initiator are escrowed; either party may still act.
    Open,
    /// The initiator took the escrow back. **Terminal.**
    Cancelled,
    /// The executor settled the swap. **Terminal.**
    Executed,
}

impl SwapStatus {
    /// Can a swap in this state transition to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Open, Self::Cancelled | Self::Executed))
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Open)
    }
}

impl std::fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Executed => write!(f, "EXECUTED"),
        }
    }
}

/// The caller-supplied terms of a swap, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSwap {
    pub token_a: Address,
    pub token_b: Address,
    pub amount_a: Decimal,
    pub amount_b: Decimal,
    pub unlock_date: DateTime<Utc>,
    pub executor: Address,
    pub claim_issuer: Address,
}

impl NewSwap {
    /// Check the terms in the order a registry must report failures:
    /// assets, executor, claim issuer, then amounts.
    ///
    /// # Errors
    /// - `InvalidAsset` if either token is the zero address
    /// - `ExecutorRequired` if the executor is the zero address
    /// - `ClaimIssuerRequired` if the claim issuer is the zero address
    /// - `InvalidAmount` if either amount is not strictly positive
    pub fn validate(&self) -> crate::Result<()> {
        if self.token_a.is_zero() || self.token_b.is_zero() {
            return Err(SwapError::InvalidAsset);
        }
        if self.executor.is_zero() {
            return Err(SwapError::ExecutorRequired);
        }
        // Required even when unlock_date has already passed.
        if self.claim_issuer.is_zero() {
            return Err(SwapError::ClaimIssuerRequired);
        }
        for amount in [self.amount_a, self.amount_b] {
            if amount <= Decimal::ZERO {
                return Err(SwapError::InvalidAmount { amount });
            }
        }
        Ok(())
    }
}

/// A stored escrow record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swap {
    pub id: SwapId,
    pub token_a: Address,
    pub token_b: Address,
    /// Escrowed by the initiator at creation.
    pub amount_a: Decimal,
    /// Supplied by the executor at settlement.
    pub amount_b: Decimal,
    pub unlock_date: DateTime<Utc>,
    /// The only party allowed to cancel.
    pub initiator: Address,
    /// The only party allowed to execute.
    pub executor: Address,
    pub claim_issuer: Address,
    pub status: SwapStatus,
    pub created_at: DateTime<Utc>,
}

impl Swap {
    /// Build an open record from validated terms.
    #[must_use]
    pub fn open(id: SwapId, initiator: Address, terms: NewSwap, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            token_a: terms.token_a,
            token_b: terms.token_b,
            amount_a: terms.amount_a,
            amount_b: terms.amount_b,
            unlock_date: terms.unlock_date,
            initiator,
            executor: terms.executor,
            claim_issuer: terms.claim_issuer,
            status: SwapStatus::Open,
            created_at,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == SwapStatus::Open
    }

    /// Fails with `SwapNotOpen` unless the swap can still transition.
    pub fn ensure_open(&self) -> crate::Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(SwapError::SwapNotOpen {
                id: self.id,
                status: self.status,
            })
        }
    }

    /// Attempt to transition to CANCELLED.
    ///
    /// # Errors
    /// Returns `SwapNotOpen` if the swap is already terminal.
    pub fn mark_cancelled(&mut self) -> crate::Result<()> {
        self.transition(SwapStatus::Cancelled)
    }

    /// Attempt to transition to EXECUTED.
    ///
    /// # Errors
    /// Returns `SwapNotOpen` if the swap is already terminal.
    pub fn mark_executed(&mut self) -> crate::Result<()> {
        self.transition(SwapStatus::Executed)
    }

    fn transition(&mut self, target: SwapStatus) -> crate::Result<()> {
        if !self.status.can_transition_to(target) {
            return Err(SwapError::SwapNotOpen {
                id: self.id,
                status: self.status,
            });
        }
        self.status = target;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

#[cfg(any(test, feature = "test-helpers"))]
impl NewSwap {
    /// 1.0 A for 1.0 B between two fixed tokens, unlocking at `unlock_date`.
    #[must_use]
    pub fn dummy(unlock_date: DateTime<Utc>, executor: Address, claim_issuer: Address) -> Self {
        Self {
            token_a: Address::from_u64(0xA),
            token_b: Address::from_u64(0xB),
            amount_a: Decimal::ONE,
            amount_b: Decimal::ONE,
            unlock_date,
            executor,
            claim_issuer,
        }
    }
}
