//! # daoswap-types
//!
//! Shared types, errors, and configuration for the **DAOSwap** escrow.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`SwapId`], [`ClaimId`]
//! - **Swap model**: [`Swap`], [`SwapStatus`], [`NewSwap`]
//! - **Claim model**: [`Claim`]
//! - **Settlement model**: [`SettlementMode`], [`Settlement`]
//! - **Events**: [`SwapEvent`]
//! - **Clock**: [`Clock`], [`SystemClock`] (and `ManualClock` behind `test-helpers`)
//! - **Configuration**: [`RegistryConfig`]
//! - **Errors**: [`SwapError`] with `DS_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod claim;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod settlement;
pub mod swap;

// Re-export all primary types at crate root for ergonomic imports:
//   use daoswap_types::{Swap, SwapId, Address, SwapError, ...};

pub use claim::*;
pub use clock::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use settlement::*;
pub use swap::*;

// Constants are accessed via `daoswap_types::constants::FOO`
// (not re-exported to avoid name collisions).
