//! The swap registry.
//!
//! Owns every [`Swap`] record and is the single choke point for the three
//! transitions. Preconditions are checked before any collaborator is
//! called; collaborator calls run under a savepoint; the status flip and
//! event are committed only after every call succeeded.

use std::collections::BTreeMap;

use daoswap_ledger::{ClaimIssuer, TokenLedger, Transactional};
use daoswap_types::{
    Address, Clock, NewSwap, RegistryConfig, Result, Settlement, SettlementMode, Swap, SwapError,
    SwapEvent, SwapId, SystemClock,
};

use crate::settlement::{self, atomically};

/// Owns swap records and the collaborators needed to settle them.
///
/// `L` is the token ledger, `C` the claim issuer type (any number of
/// instances may be registered, keyed by address), `K` the clock.
pub struct SwapRegistry<L, C, K = SystemClock> {
    config: RegistryConfig,
    /// All swaps ever created, by ID. Never pruned.
    swaps: BTreeMap<SwapId, Swap>,
    /// Identifier for the next swap.
    next_id: SwapId,
    ledger: L,
    /// Claim issuers reachable by the deferred settlement path.
    issuers: BTreeMap<Address, C>,
    clock: K,
    /// Append-only audit log.
    events: Vec<SwapEvent>,
}

impl<L, C> SwapRegistry<L, C, SystemClock>
where
    L: TokenLedger + Transactional,
    C: ClaimIssuer + Transactional,
{
    /// Create a registry reading wall-clock time.
    ///
    /// # Errors
    /// Returns `Configuration` if `config` is invalid.
    pub fn new(config: RegistryConfig, ledger: L) -> Result<Self> {
        Self::with_clock(config, ledger, SystemClock)
    }
}

impl<L, C, K> SwapRegistry<L, C, K>
where
    L: TokenLedger + Transactional,
    C: ClaimIssuer + Transactional,
    K: Clock,
{
    /// Create a registry with an explicit clock.
    ///
    /// # Errors
    /// Returns `Configuration` if `config` is invalid.
    pub fn with_clock(config: RegistryConfig, ledger: L, clock: K) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            next_id: config.first_swap_id(),
            config,
            swaps: BTreeMap::new(),
            ledger,
            issuers: BTreeMap::new(),
            clock,
            events: Vec::new(),
        })
    }

    /// Make a claim issuer reachable under `address`. Returns the issuer
    /// previously registered there, if any.
    ///
    /// # Errors
    /// Returns `ClaimIssuerRequired` if `address` is the zero address.
    pub fn register_claim_issuer(&mut self, address: Address, issuer: C) -> Result<Option<C>> {
        if address.is_zero() {
            return Err(SwapError::ClaimIssuerRequired);
        }
        tracing::info!(issuer = %address, "Claim issuer registered");
        Ok(self.issuers.insert(address, issuer))
    }

    // ---------------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------------

    /// Escrow `terms.amount_a` of `terms.token_a` from `initiator` and open a
    /// new swap.
    ///
    /// The initiator must have approved the custody account for at least
    /// `amount_a` beforehand.
    ///
    /// # Errors
    /// In order: `InvalidAsset`, `ExecutorRequired`, `ClaimIssuerRequired`,
    /// `InvalidAmount`, then `InsufficientFunds` / `InsufficientAllowance`
    /// from the ledger.
    pub fn create_swap(&mut self, initiator: Address, terms: NewSwap) -> Result<SwapId> {
        terms.validate()?;

        let id = self.next_id;
        let next_id = id
            .next()
            .ok_or_else(|| SwapError::Internal("swap id space exhausted".into()))?;
        let custody = self.config.custody_account;

        atomically(&mut self.ledger, |ledger| {
            ledger.transfer_from(terms.token_a, custody, initiator, custody, terms.amount_a)
        })
        .inspect_err(|err| {
            tracing::warn!(initiator = %initiator, error = %err, "Swap creation rejected");
        })?;

        let swap = Swap::open(id, initiator, terms, self.clock.now());
        self.next_id = next_id;
        self.swaps.insert(id, swap.clone());

        tracing::info!(
            swap = %id,
            initiator = %swap.initiator,
            executor = %swap.executor,
            token_a = %swap.token_a,
            amount_a = %swap.amount_a,
            token_b = %swap.token_b,
            amount_b = %swap.amount_b,
            unlock_date = %swap.unlock_date,
            claim_issuer = %swap.claim_issuer,
            "Swap created"
        );
        self.events.push(SwapEvent::Created { swap });
        Ok(id)
    }

    /// Refund the escrowed `token_a` leg to the initiator and close the swap.
    ///
    /// # Errors
    /// `SwapNotFound`, `SwapNotOpen`, `NotAuthorized` (caller is not the
    /// initiator), or a ledger error.
    pub fn cancel_swap(&mut self, caller: Address, id: SwapId) -> Result<()> {
        let swap = self.open_swap(id)?.clone();
        if caller != swap.initiator {
            return Err(SwapError::NotAuthorized {
                id,
                caller,
                action: "cancel",
            });
        }

        let custody = self.config.custody_account;
        atomically(&mut self.ledger, |ledger| {
            ledger.transfer(swap.token_a, custody, swap.initiator, swap.amount_a)
        })
        .inspect_err(|err| {
            tracing::warn!(swap = %id, error = %err, "Cancellation rolled back");
        })?;

        self.record_mut(id)?.mark_cancelled()?;
        tracing::info!(swap = %id, initiator = %caller, "Swap cancelled");
        self.events.push(SwapEvent::Cancelled { id });
        Ok(())
    }

    /// Settle the swap. The path is chosen by comparing the clock with
    /// `unlock_date` at this moment; see [`SettlementMode::select`].
    ///
    /// # Errors
    /// `SwapNotFound`, `SwapNotOpen`, `NotAuthorized` (caller is not the
    /// executor), `ClaimIssuerUnavailable` on the deferred path when the
    /// swap's issuer is not registered, or any ledger / issuer error.
    pub fn execute_swap(&mut self, caller: Address, id: SwapId) -> Result<Settlement> {
        let swap = self.open_swap(id)?.clone();
        if caller != swap.executor {
            return Err(SwapError::NotAuthorized {
                id,
                caller,
                action: "execute",
            });
        }

        let now = self.clock.now();
        let mode = SettlementMode::select(now, swap.unlock_date);
        let custody = self.config.custody_account;
        tracing::debug!(swap = %id, mode = %mode, now = %now, "Settlement path selected");

        let outcome = match mode {
            SettlementMode::DirectTransfer => atomically(&mut self.ledger, |ledger| {
                settlement::direct(ledger, &swap, custody)
            }),
            SettlementMode::DeferredClaim => {
                let issuer = self
                    .issuers
                    .get_mut(&swap.claim_issuer)
                    .ok_or(SwapError::ClaimIssuerUnavailable(swap.claim_issuer))?;
                atomically(&mut self.ledger, |ledger| {
                    atomically(issuer, |issuer| {
                        settlement::deferred(ledger, issuer, &swap, custody, now)
                    })
                })
            }
        }
        .inspect_err(|err| {
            tracing::warn!(swap = %id, mode = %mode, error = %err, "Settlement rolled back");
        })?;

        self.record_mut(id)?.mark_executed()?;
        tracing::info!(swap = %id, executor = %caller, mode = %mode, "Swap executed");
        self.events.push(SwapEvent::Executed {
            id,
            settlement: outcome,
        });
        Ok(outcome)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// # Errors
    /// Returns `SwapNotFound` if `id` was never assigned.
    pub fn get_swap_details(&self, id: SwapId) -> Result<&Swap> {
        self.swaps.get(&id).ok_or(SwapError::SwapNotFound(id))
    }

    /// Number of swaps ever created.
    #[must_use]
    pub fn swap_count(&self) -> usize {
        self.swaps.len()
    }

    /// Swaps still awaiting cancel or execute, in ID order.
    pub fn open_swaps(&self) -> impl Iterator<Item = &Swap> {
        self.swaps.values().filter(|s| s.is_open())
    }

    /// Every event since creation (or since the last [`take_events`]).
    ///
    /// [`take_events`]: Self::take_events
    #[must_use]
    pub fn events(&self) -> &[SwapEvent] {
        &self.events
    }

    /// Drain the event log for an external consumer.
    pub fn take_events(&mut self) -> Vec<SwapEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The ledger account holding escrowed funds.
    #[must_use]
    pub fn custody_account(&self) -> Address {
        self.config.custody_account
    }

    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Direct ledger access, e.g. for funding and approvals.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    #[must_use]
    pub fn claim_issuer(&self, address: Address) -> Option<&C> {
        self.issuers.get(&address)
    }

    #[must_use]
    pub fn clock(&self) -> &K {
        &self.clock
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn open_swap(&self, id: SwapId) -> Result<&Swap> {
        let swap = self.get_swap_details(id)?;
        swap.ensure_open()?;
        Ok(swap)
    }

    fn record_mut(&mut self, id: SwapId) -> Result<&mut Swap> {
        self.swaps.get_mut(&id).ok_or(SwapError::SwapNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use daoswap_ledger::{InMemoryClaimIssuer, InMemoryLedger};
    use daoswap_types::{ManualClock, SwapStatus};
    use rust_decimal::Decimal;

    const ISSUER: Address = Address::from_u64(0xC1);
    const INITIATOR: Address = Address::from_u64(3);
    const EXECUTOR: Address = Address::from_u64(4);
    const STRANGER: Address = Address::from_u64(5);

    type Registry = SwapRegistry<InMemoryLedger, InMemoryClaimIssuer, ManualClock>;

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    /// Registry with the initiator funded and approved for 1.0 A, the
    /// executor funded and approved for 1.0 B.
    fn setup() -> (Registry, ManualClock) {
        let clock = ManualClock::new(start());
        let mut registry =
            Registry::with_clock(RegistryConfig::default(), InMemoryLedger::new(), clock.clone())
                .unwrap();
        registry
            .register_claim_issuer(ISSUER, InMemoryClaimIssuer::new(ISSUER))
            .unwrap();

        let custody = registry.custody_account();
        let terms = terms(start());
        let ledger = registry.ledger_mut();
        ledger.mint(terms.token_a, INITIATOR, Decimal::ONE).unwrap();
        ledger
            .approve(terms.token_a, INITIATOR, custody, Decimal::ONE)
            .unwrap();
        ledger.mint(terms.token_b, EXECUTOR, Decimal::ONE).unwrap();
        ledger
            .approve(terms.token_b, EXECUTOR, custody, Decimal::ONE)
            .unwrap();
        (registry, clock)
    }

    fn terms(unlock_date: DateTime<Utc>) -> NewSwap {
        NewSwap::dummy(unlock_date, EXECUTOR, ISSUER)
    }

    fn balance(registry: &Registry, token: Address, account: Address) -> Decimal {
        registry.ledger().balance_of(token, account).unwrap()
    }

    #[test]
    fn create_escrows_token_a() {
        let (mut registry, _) = setup();
        let t = terms(start() + Duration::days(1));
        let id = registry.create_swap(INITIATOR, t.clone()).unwrap();

        assert_eq!(id, SwapId(0));
        let custody = registry.custody_account();
        assert_eq!(balance(&registry, t.token_a, custody), Decimal::ONE);
        assert_eq!(balance(&registry, t.token_a, INITIATOR), Decimal::ZERO);

        let swap = registry.get_swap_details(id).unwrap();
        assert_eq!(swap.initiator, INITIATOR);
        assert_eq!(swap.status, SwapStatus::Open);
        assert_eq!(swap.created_at, start());
        assert!(matches!(
            registry.events(),
            [SwapEvent::Created { swap }] if swap.id == id
        ));
    }

    #[test]
    fn create_respects_initial_id() {
        let config = RegistryConfig {
            initial_swap_id: 100,
            ..RegistryConfig::default()
        };
        let mut registry: Registry =
            SwapRegistry::with_clock(config, InMemoryLedger::new(), ManualClock::new(start()))
                .unwrap();
        let t = terms(start());
        let custody = registry.custody_account();
        let ledger = registry.ledger_mut();
        ledger.mint(t.token_a, INITIATOR, Decimal::TEN).unwrap();
        ledger
            .approve(t.token_a, INITIATOR, custody, Decimal::TEN)
            .unwrap();

        assert_eq!(registry.create_swap(INITIATOR, t.clone()).unwrap(), SwapId(100));
        assert_eq!(registry.create_swap(INITIATOR, t).unwrap(), SwapId(101));
    }

    #[test]
    fn failed_create_consumes_no_id() {
        let (mut registry, _) = setup();
        let mut t = terms(start());
        t.amount_a = Decimal::TEN;
        let err = registry.create_swap(INITIATOR, t).unwrap_err();
        assert!(matches!(err, SwapError::InsufficientFunds { .. }));
        assert!(registry.events().is_empty());

        let id = registry.create_swap(INITIATOR, terms(start())).unwrap();
        assert_eq!(id, SwapId(0));
    }

    #[test]
    fn cancel_refunds_initiator() {
        let (mut registry, _) = setup();
        let t = terms(start() + Duration::days(1));
        let id = registry.create_swap(INITIATOR, t.clone()).unwrap();

        registry.cancel_swap(INITIATOR, id).unwrap();
        assert_eq!(balance(&registry, t.token_a, INITIATOR), Decimal::ONE);
        assert_eq!(
            registry.get_swap_details(id).unwrap().status,
            SwapStatus::Cancelled
        );
        assert_eq!(
            registry.events().last(),
            Some(&SwapEvent::Cancelled { id })
        );
    }

    #[test]
    fn cancel_by_stranger_rejected() {
        let (mut registry, _) = setup();
        let id = registry
            .create_swap(INITIATOR, terms(start() + Duration::days(1)))
            .unwrap();

        let err = registry.cancel_swap(EXECUTOR, id).unwrap_err();
        assert_eq!(
            err,
            SwapError::NotAuthorized {
                id,
                caller: EXECUTOR,
                action: "cancel"
            }
        );
        assert!(registry.get_swap_details(id).unwrap().is_open());
    }

    #[test]
    fn execute_before_unlock_issues_claims() {
        let (mut registry, _) = setup();
        let t = terms(start() + Duration::days(1));
        let id = registry.create_swap(INITIATOR, t.clone()).unwrap();

        let outcome = registry.execute_swap(EXECUTOR, id).unwrap();
        assert_eq!(outcome.mode(), SettlementMode::DeferredClaim);

        let issuer = registry.claim_issuer(ISSUER).unwrap();
        assert_eq!(issuer.balance_of(EXECUTOR), 1);
        assert_eq!(issuer.balance_of(INITIATOR), 1);
        assert_eq!(balance(&registry, t.token_a, EXECUTOR), Decimal::ZERO);
        assert_eq!(balance(&registry, t.token_b, INITIATOR), Decimal::ZERO);
        assert_eq!(balance(&registry, t.token_b, EXECUTOR), Decimal::ZERO);
    }

    #[test]
    fn execute_after_unlock_transfers_directly() {
        let (mut registry, clock) = setup();
        let t = terms(start() + Duration::days(1));
        let id = registry.create_swap(INITIATOR, t.clone()).unwrap();

        clock.advance(Duration::days(2));
        let outcome = registry.execute_swap(EXECUTOR, id).unwrap();

        assert_eq!(outcome, Settlement::DirectTransfer);
        assert_eq!(balance(&registry, t.token_a, EXECUTOR), Decimal::ONE);
        assert_eq!(balance(&registry, t.token_b, INITIATOR), Decimal::ONE);
        assert_eq!(registry.claim_issuer(ISSUER).unwrap().count(), 0);
    }

    #[test]
    fn execute_at_exact_unlock_is_direct() {
        let (mut registry, clock) = setup();
        let unlock = start() + Duration::hours(1);
        let id = registry.create_swap(INITIATOR, terms(unlock)).unwrap();
        clock.set(unlock);
        assert_eq!(
            registry.execute_swap(EXECUTOR, id).unwrap(),
            Settlement::DirectTransfer
        );
    }

    #[test]
    fn execute_by_stranger_rejected_before_funds_move() {
        let (mut registry, _) = setup();
        let t = terms(start() + Duration::days(1));
        let id = registry.create_swap(INITIATOR, t.clone()).unwrap();

        let err = registry.execute_swap(STRANGER, id).unwrap_err();
        assert!(matches!(err, SwapError::NotAuthorized { action: "execute", .. }));
        assert_eq!(balance(&registry, t.token_b, EXECUTOR), Decimal::ONE);
        assert!(registry.get_swap_details(id).unwrap().is_open());
    }

    #[test]
    fn terminal_swaps_reject_further_transitions() {
        let (mut registry, _) = setup();
        let id = registry
            .create_swap(INITIATOR, terms(start() + Duration::days(1)))
            .unwrap();
        registry.cancel_swap(INITIATOR, id).unwrap();

        let not_open = SwapError::SwapNotOpen {
            id,
            status: SwapStatus::Cancelled,
        };
        assert_eq!(registry.cancel_swap(INITIATOR, id).unwrap_err(), not_open);
        assert_eq!(registry.execute_swap(EXECUTOR, id).unwrap_err(), not_open);
    }

    #[test]
    fn status_checked_before_authorization() {
        let (mut registry, _) = setup();
        let id = registry
            .create_swap(INITIATOR, terms(start() + Duration::days(1)))
            .unwrap();
        registry.cancel_swap(INITIATOR, id).unwrap();
        let err = registry.cancel_swap(STRANGER, id).unwrap_err();
        assert!(matches!(err, SwapError::SwapNotOpen { .. }));
    }

    #[test]
    fn unknown_id_not_found() {
        let (mut registry, _) = setup();
        let missing = SwapId(1000);
        assert_eq!(
            registry.get_swap_details(missing).unwrap_err(),
            SwapError::SwapNotFound(missing)
        );
        assert_eq!(
            registry.cancel_swap(INITIATOR, missing).unwrap_err(),
            SwapError::SwapNotFound(missing)
        );
        assert_eq!(
            registry.execute_swap(EXECUTOR, missing).unwrap_err(),
            SwapError::SwapNotFound(missing)
        );
    }

    #[test]
    fn unregistered_issuer_rolls_back_nothing_moved() {
        let (mut registry, _) = setup();
        let mut t = terms(start() + Duration::days(1));
        t.claim_issuer = STRANGER;
        let id = registry.create_swap(INITIATOR, t.clone()).unwrap();

        let err = registry.execute_swap(EXECUTOR, id).unwrap_err();
        assert_eq!(err, SwapError::ClaimIssuerUnavailable(STRANGER));
        assert_eq!(balance(&registry, t.token_b, EXECUTOR), Decimal::ONE);
        assert!(registry.get_swap_details(id).unwrap().is_open());
        assert_eq!(registry.events().len(), 1);
    }

    #[test]
    fn open_swaps_and_event_drain() {
        let (mut registry, _) = setup();
        let custody = registry.custody_account();
        let t = terms(start());
        let ledger = registry.ledger_mut();
        ledger.mint(t.token_a, INITIATOR, Decimal::ONE).unwrap();
        ledger
            .approve(t.token_a, INITIATOR, custody, Decimal::TWO)
            .unwrap();

        let a = registry.create_swap(INITIATOR, t.clone()).unwrap();
        let b = registry.create_swap(INITIATOR, t).unwrap();
        registry.cancel_swap(INITIATOR, a).unwrap();

        let open: Vec<SwapId> = registry.open_swaps().map(|s| s.id).collect();
        assert_eq!(open, vec![b]);
        assert_eq!(registry.swap_count(), 2);

        let drained = registry.take_events();
        assert_eq!(drained.len(), 3);
        assert!(registry.events().is_empty());
    }

    #[test]
    fn zero_issuer_registration_rejected() {
        let (mut registry, _) = setup();
        let err = registry
            .register_claim_issuer(Address::ZERO, InMemoryClaimIssuer::new(Address::ZERO))
            .unwrap_err();
        assert_eq!(err, SwapError::ClaimIssuerRequired);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = RegistryConfig {
            custody_account: Address::ZERO,
            ..RegistryConfig::default()
        };
        let result: Result<SwapRegistry<InMemoryLedger, InMemoryClaimIssuer>> =
            SwapRegistry::new(config, InMemoryLedger::new());
        assert!(matches!(result, Err(SwapError::Configuration(_))));
    }
}
