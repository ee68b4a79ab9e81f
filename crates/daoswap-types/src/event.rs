//! Observable registry events.
//!
//! Every successful transition appends one [`SwapEvent`] to the registry's
//! audit log. Failed operations append nothing.

use serde::{Deserialize, Serialize};

use crate::{Settlement, Swap, SwapId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapEvent {
    /// A swap was created and its `token_a` leg escrowed.
    Created { swap: Swap },
    /// The initiator cancelled and was refunded.
    Cancelled { id: SwapId },
    /// The executor settled the swap.
    Executed { id: SwapId, settlement: Settlement },
}

impl SwapEvent {
    /// The swap this event concerns.
    #[must_use]
    pub fn swap_id(&self) -> SwapId {
        match self {
            Self::Created { swap } => swap.id,
            Self::Cancelled { id } | Self::Executed { id, .. } => *id,
        }
    }

    /// Short upper-case tag, e.g. for log lines.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created { .. } => "NEW_SWAP",
            Self::Cancelled { .. } => "SWAP_CANCELLED",
            Self::Executed { .. } => "SWAP_EXECUTED",
        }
    }
}
