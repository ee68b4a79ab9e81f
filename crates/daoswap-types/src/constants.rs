//! System-wide constants for the DAOSwap escrow.

use crate::Address;

/// Length in bytes of an [`Address`].
pub const ADDRESS_LEN: usize = 20;

/// First identifier handed out by a fresh registry.
pub const DEFAULT_INITIAL_SWAP_ID: u64 = 0;

/// First identifier handed out by a fresh claim issuer.
pub const DEFAULT_INITIAL_CLAIM_ID: u64 = 1;

/// Custody account used by a registry built from [`RegistryConfig::default`].
///
/// [`RegistryConfig::default`]: crate::RegistryConfig
pub const DEFAULT_CUSTODY_ACCOUNT: Address = Address::from_u64(0xDA05_5A9F);

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "DAOSwap";
