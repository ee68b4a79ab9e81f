//! Time-locked claim receipts.
//!
//! A claim is minted by a claim issuer when a swap settles before its unlock
//! time. It entitles `holder` to `amount` of `token` once `unlock_date` has
//! passed. Claims are non-fungible and cannot be split.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, ClaimId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    /// The issuer that minted (and backs) this claim.
    pub issuer: Address,
    pub holder: Address,
    pub token: Address,
    pub amount: Decimal,
    pub unlock_date: DateTime<Utc>,
    pub issued_at: DateTime<Utc>,
}

impl Claim {
    /// Whether the claim may be redeemed at `now`.
    #[must_use]
    pub fn is_unlocked(&self, now: DateTime<Utc>) -> bool {
        now >= self.unlock_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claim(unlock_date: DateTime<Utc>) -> Claim {
        Claim {
            id: ClaimId(1),
            issuer: Address::from_u64(0xC1),
            holder: Address::from_u64(4),
            token: Address::from_u64(0xA),
            amount: Decimal::ONE,
            unlock_date,
            issued_at: Utc::now(),
        }
    }

    #[test]
    fn locked_until_unlock_date() {
        let now = Utc::now();
        let c = claim(now + Duration::days(1));
        assert!(!c.is_unlocked(now));
        assert!(c.is_unlocked(now + Duration::days(1)));
    }

    #[test]
    fn claim_serde_roundtrip() {
        let c = claim(Utc::now());
        let json = serde_json::to_string(&c).unwrap();
        let back: Claim = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
