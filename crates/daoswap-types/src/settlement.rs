//! Settlement strategies for an executed swap.
//!
//! The strategy is never stored. It is recomputed from the clock reading at
//! the moment of execution:
//!
//! ```text
//! now >= unlock_date  →  DirectTransfer   (A → executor, B → initiator)
//! now <  unlock_date  →  DeferredClaim    (one time-locked claim each)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ClaimId;

/// Which settlement path an execution takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementMode {
    /// The unlock time has passed; both legs transfer immediately.
    DirectTransfer,
    /// The unlock time is still ahead; both legs become claims.
    DeferredClaim,
}

impl SettlementMode {
    /// Pure branch predicate.
    #[must_use]
    pub fn select(now: DateTime<Utc>, unlock_date: DateTime<Utc>) -> Self {
        if now >= unlock_date {
            Self::DirectTransfer
        } else {
            Self::DeferredClaim
        }
    }
}

impl std::fmt::Display for SettlementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectTransfer => write!(f, "DIRECT_TRANSFER"),
            Self::DeferredClaim => write!(f, "DEFERRED_CLAIM"),
        }
    }
}

/// The outcome of a successful execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Settlement {
    DirectTransfer,
    DeferredClaim {
        /// Redeemable by the executor for `amount_a` of `token_a`.
        executor_claim: ClaimId,
        /// Redeemable by the initiator for `amount_b` of `token_b`.
        initiator_claim: ClaimId,
    },
}

impl Settlement {
    #[must_use]
    pub fn mode(&self) -> SettlementMode {
        match self {
            Self::DirectTransfer => SettlementMode::DirectTransfer,
            Self::DeferredClaim { .. } => SettlementMode::DeferredClaim,
        }
    }
}
