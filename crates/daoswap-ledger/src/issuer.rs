//! In-memory claim issuer minting time-locked claims.
//!
//! Before a claim is minted, the issuer checks that its custody account
//! holds enough of the token to back every outstanding claim plus the new
//! one. Under-backed claims are refused and nothing is minted.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use daoswap_types::{
    Address, Claim, ClaimId, Result, SwapError, constants::DEFAULT_INITIAL_CLAIM_ID,
};
use rust_decimal::Decimal;

use crate::traits::{ClaimIssuer, TokenLedger, Transactional};

/// Issues claims against its own custody account on a [`TokenLedger`].
#[derive(Debug, Clone)]
pub struct InMemoryClaimIssuer {
    /// Address of this issuer; also its custody account on the ledger.
    address: Address,
    /// Next identifier to hand out.
    next_id: ClaimId,
    /// All claims ever issued, by ID.
    claims: BTreeMap<ClaimId, Claim>,
    /// Claim IDs per holder, in issuance order.
    by_holder: HashMap<Address, Vec<ClaimId>>,
}

/// Captured [`InMemoryClaimIssuer`] state.
#[derive(Debug, Clone)]
pub struct IssuerSavepoint {
    next_id: ClaimId,
    claims: BTreeMap<ClaimId, Claim>,
    by_holder: HashMap<Address, Vec<ClaimId>>,
}

impl InMemoryClaimIssuer {
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            next_id: ClaimId(DEFAULT_INITIAL_CLAIM_ID),
            claims: BTreeMap::new(),
            by_holder: HashMap::new(),
        }
    }

    /// Total amount of `token` promised by claims issued so far.
    #[must_use]
    pub fn outstanding(&self, token: Address) -> Decimal {
        self.claims
            .values()
            .filter(|c| c.token == token)
            .map(|c| c.amount)
            .sum()
    }

    /// Number of claims issued.
    #[must_use]
    pub fn count(&self) -> usize {
        self.claims.len()
    }
}

impl ClaimIssuer for InMemoryClaimIssuer {
    fn custody_account(&self) -> Address {
        self.address
    }

    fn issue_claim<L: TokenLedger>(
        &mut self,
        ledger: &L,
        holder: Address,
        token: Address,
        amount: Decimal,
        unlock_date: DateTime<Utc>,
        issued_at: DateTime<Utc>,
    ) -> Result<ClaimId> {
        if amount <= Decimal::ZERO {
            return Err(SwapError::InvalidAmount { amount });
        }

        // Step 1: custody must cover every claim including this one
        let backing = ledger.balance_of(token, self.address)?;
        let needed = self.outstanding(token) + amount;
        if backing < needed {
            return Err(SwapError::InsufficientFunds {
                token,
                needed,
                available: backing,
            });
        }

        // Step 2: allocate the ID
        let id = self.next_id;
        self.next_id = id
            .next()
            .ok_or_else(|| SwapError::Internal("claim id space exhausted".into()))?;

        // Step 3: store and index
        self.claims.insert(
            id,
            Claim {
                id,
                issuer: self.address,
                holder,
                token,
                amount,
                unlock_date,
                issued_at,
            },
        );
        self.by_holder.entry(holder).or_default().push(id);

        tracing::debug!(
            issuer = %self.address,
            claim = %id,
            holder = %holder,
            token = %token,
            amount = %amount,
            unlock_date = %unlock_date,
            "Claim issued"
        );
        Ok(id)
    }

    fn claim(&self, id: ClaimId) -> Option<&Claim> {
        self.claims.get(&id)
    }

    fn claims_of(&self, holder: Address) -> Vec<&Claim> {
        self.by_holder
            .get(&holder)
            .map(|ids| ids.iter().filter_map(|id| self.claims.get(id)).collect())
            .unwrap_or_default()
    }
}

impl Transactional for InMemoryClaimIssuer {
    type Savepoint = IssuerSavepoint;

    fn savepoint(&self) -> IssuerSavepoint {
        IssuerSavepoint {
            next_id: self.next_id,
            claims: self.claims.clone(),
            by_holder: self.by_holder.clone(),
        }
    }

    fn rollback_to(&mut self, savepoint: IssuerSavepoint) {
        self.next_id = savepoint.next_id;
        self.claims = savepoint.claims;
        self.by_holder = savepoint.by_holder;
    }
}
