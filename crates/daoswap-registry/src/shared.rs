//! Thread-safe handle around a [`SwapRegistry`].
//!
//! Every call takes the lock for its full duration, so transitions are
//! serialized: of a racing cancel and execute on the same swap, exactly one
//! observes it open.

use std::sync::{Arc, Mutex, MutexGuard};

use daoswap_ledger::{ClaimIssuer, TokenLedger, Transactional};
use daoswap_types::{
    Address, Clock, NewSwap, Result, Settlement, Swap, SwapError, SwapId, SystemClock,
};

use crate::registry::SwapRegistry;

/// Cloneable, lock-guarded registry. Clones share the same state.
pub struct SharedRegistry<L, C, K = SystemClock> {
    inner: Arc<Mutex<SwapRegistry<L, C, K>>>,
}

impl<L, C, K> Clone for SharedRegistry<L, C, K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L, C, K> SharedRegistry<L, C, K>
where
    L: TokenLedger + Transactional,
    C: ClaimIssuer + Transactional,
    K: Clock,
{
    #[must_use]
    pub fn new(registry: SwapRegistry<L, C, K>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SwapRegistry<L, C, K>>> {
        self.inner
            .lock()
            .map_err(|_| SwapError::Internal("registry mutex poisoned".into()))
    }

    /// See [`SwapRegistry::create_swap`].
    pub fn create_swap(&self, initiator: Address, terms: NewSwap) -> Result<SwapId> {
        self.lock()?.create_swap(initiator, terms)
    }

    /// See [`SwapRegistry::cancel_swap`].
    pub fn cancel_swap(&self, caller: Address, id: SwapId) -> Result<()> {
        self.lock()?.cancel_swap(caller, id)
    }

    /// See [`SwapRegistry::execute_swap`].
    pub fn execute_swap(&self, caller: Address, id: SwapId) -> Result<Settlement> {
        self.lock()?.execute_swap(caller, id)
    }

    /// Snapshot of a swap record.
    pub fn get_swap_details(&self, id: SwapId) -> Result<Swap> {
        self.lock()?.get_swap_details(id).cloned()
    }

    /// Run `f` with exclusive access to the registry.
    pub fn with<T>(&self, f: impl FnOnce(&mut SwapRegistry<L, C, K>) -> T) -> Result<T> {
        Ok(f(&mut *self.lock()?))
    }
}
