//! Error types for the DAOSwap escrow.
//!
//! All errors use the `DS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Swap creation errors
//! - 2xx: Ledger errors
//! - 3xx: Lifecycle / authorization errors
//! - 4xx: Claim issuer errors
//! - 9xx: General / internal errors
//!
//! None of these are transient. Callers surface them unchanged.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Address, SwapId, SwapStatus};

/// Central error enum for all DAOSwap operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SwapError {
    // =================================================================
    // Creation Errors (1xx)
    // =================================================================
    /// One of the two token references is the zero address.
    #[error("DS_ERR_100: Invalid asset: token address is zero")]
    InvalidAsset,

    /// The executor reference is the zero address.
    #[error("DS_ERR_101: Executor cannot be the zero address")]
    ExecutorRequired,

    /// The claim issuer reference is the zero address.
    #[error("DS_ERR_102: Claim issuer cannot be the zero address")]
    ClaimIssuerRequired,

    /// A swap amount is zero or negative.
    #[error("DS_ERR_103: Invalid amount: {amount} (must be positive)")]
    InvalidAmount { amount: Decimal },

    // =================================================================
    // Ledger Errors (2xx)
    // =================================================================
    /// The debited account holds less than the requested amount.
    #[error("DS_ERR_200: Insufficient funds in {token}: need {needed}, have {available}")]
    InsufficientFunds {
        token: Address,
        needed: Decimal,
        available: Decimal,
    },

    /// The spender was not authorized to move this much.
    #[error("DS_ERR_201: Insufficient allowance in {token}: need {needed}, allowed {allowed}")]
    InsufficientAllowance {
        token: Address,
        needed: Decimal,
        allowed: Decimal,
    },

    /// The ledger has never heard of this token.
    #[error("DS_ERR_202: Unknown token: {0}")]
    UnknownToken(Address),

    /// Sum of balances no longer matches minted supply. Critical safety alert.
    #[error("DS_ERR_203: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // Lifecycle / Authorization Errors (3xx)
    // =================================================================
    /// No swap was ever assigned this identifier.
    #[error("DS_ERR_300: Swap does not exist: {0}")]
    SwapNotFound(SwapId),

    /// The swap already reached a terminal state.
    #[error("DS_ERR_301: Swap {id} is {status}, not OPEN")]
    SwapNotOpen { id: SwapId, status: SwapStatus },

    /// The caller is not the party allowed to perform this transition.
    #[error("DS_ERR_302: {caller} is not authorized to {action} {id}")]
    NotAuthorized {
        id: SwapId,
        caller: Address,
        action: &'static str,
    },

    // =================================================================
    // Claim Issuer Errors (4xx)
    // =================================================================
    /// The swap names a claim issuer the registry cannot reach.
    #[error("DS_ERR_400: Claim issuer {0} is not registered")]
    ClaimIssuerUnavailable(Address),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("DS_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Configuration error (invalid config document, bad values, etc.).
    #[error("DS_ERR_901: Configuration error: {0}")]
    Configuration(String),

    /// An address string could not be parsed.
    #[error("DS_ERR_902: Invalid address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: String },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SwapError>;

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}
