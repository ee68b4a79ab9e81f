//! Configuration for a swap registry.

use serde::{Deserialize, Serialize};

use crate::{Address, SwapError, SwapId, constants};

/// Configuration for a single swap registry instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// The ledger account that holds escrowed funds between creation and
    /// settlement. Callers approve this account as spender.
    pub custody_account: Address,
    /// Identifier assigned to the first swap.
    pub initial_swap_id: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            custody_account: constants::DEFAULT_CUSTODY_ACCOUNT,
            initial_swap_id: constants::DEFAULT_INITIAL_SWAP_ID,
        }
    }
}

impl RegistryConfig {
    /// Parse and validate a JSON config document. Missing fields take their
    /// defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    /// Returns `Configuration` if the custody account is the zero address.
    pub fn validate(&self) -> crate::Result<()> {
        if self.custody_account.is_zero() {
            return Err(SwapError::Configuration(
                "custody_account cannot be the zero address".into(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn first_swap_id(&self) -> SwapId {
        SwapId(self.initial_swap_id)
    }
}
