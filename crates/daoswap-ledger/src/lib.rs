//! # daoswap-ledger
//!
//! **Collaborator seams** for the swap registry: the fungible-token ledger and
//! the time-locked claim issuer.
//!
//! ## Architecture
//!
//! The registry never touches balances directly. It calls through:
//! 1. **TokenLedger**: ERC20-style balances and allowances per (token, account)
//! 2. **ClaimIssuer**: mints non-fungible, time-locked claims backed by tokens
//!    forwarded into the issuer's custody account
//! 3. **Transactional**: savepoint / rollback, so a failed registry call leaves
//!    no partial custody change behind
//!
//! In-memory implementations of all three ship here:
//! [`InMemoryLedger`] and [`InMemoryClaimIssuer`].

pub mod issuer;
pub mod ledger;
pub mod supply;
pub mod traits;

pub use issuer::InMemoryClaimIssuer;
pub use ledger::InMemoryLedger;
pub use supply::SupplyAudit;
pub use traits::{ClaimIssuer, TokenLedger, Transactional};
