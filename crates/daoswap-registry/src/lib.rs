//! # daoswap-registry
//!
//! **Core**: the swap registry. Owns every swap record, assigns identifiers,
//! authorizes and executes the three transitions, and dispatches settlement.
//!
//! ## Swap Flow
//!
//! ```text
//! initiator ─ create_swap ─▶ ledger.transfer_from(A → custody) ─▶ OPEN
//!
//! OPEN ─ cancel_swap (initiator) ─▶ ledger.transfer(A → initiator) ─▶ CANCELLED
//!
//! OPEN ─ execute_swap (executor) ─▶ ledger.transfer_from(B → custody)
//!        ├─ now >= unlock: A → executor, B → initiator            ─▶ EXECUTED
//!        └─ now <  unlock: A, B → issuer custody, one claim each  ─▶ EXECUTED
//! ```
//!
//! Every transition is all-or-nothing: collaborators are rolled back to a
//! savepoint on failure and the record keeps its previous status.

pub mod registry;
pub mod settlement;
pub mod shared;

pub use registry::SwapRegistry;
pub use shared::SharedRegistry;
