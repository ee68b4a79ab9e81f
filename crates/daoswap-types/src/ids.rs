//! Identifiers used throughout DAOSwap.
//!
//! Accounts, tokens, and services share one 20-byte [`Address`] space, with
//! the all-zero address standing in for "no reference". Swaps and claims are
//! numbered sequentially by their owning component.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{SwapError, constants::ADDRESS_LEN};

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte reference to an account, a token, or a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// The null reference.
    pub const ZERO: Self = Self([0u8; ADDRESS_LEN]);

    /// Build an address whose low 8 bytes hold `n` (big-endian).
    #[must_use]
    pub const fn from_u64(n: u64) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        let be = n.to_be_bytes();
        let mut i = 0;
        while i < be.len() {
            bytes[ADDRESS_LEN - be.len() + i] = be[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Whether this is the null reference.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    /// A random non-zero address.
    #[cfg(any(test, feature = "test-helpers"))]
    #[must_use]
    pub fn random() -> Self {
        loop {
            let candidate = Self(rand::random());
            if !candidate.is_zero() {
                return candidate;
            }
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = SwapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| SwapError::InvalidAddress {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        let bytes: [u8; ADDRESS_LEN] =
            bytes
                .try_into()
                .map_err(|b: Vec<u8>| SwapError::InvalidAddress {
                    input: s.to_string(),
                    reason: format!("expected {ADDRESS_LEN} bytes, got {}", b.len()),
                })?;
        Ok(Self(bytes))
    }
}

// ---------------------------------------------------------------------------
// SwapId
// ---------------------------------------------------------------------------

/// Monotonically assigned swap identifier. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SwapId(pub u64);

impl SwapId {
    /// The identifier after this one, or `None` on overflow.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "swap:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ClaimId
// ---------------------------------------------------------------------------

/// Identifier of a time-locked claim, unique within its issuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ClaimId(pub u64);

impl ClaimId {
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "claim:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
