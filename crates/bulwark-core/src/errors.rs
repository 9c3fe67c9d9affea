//! Error types for Bulwark

use thiserror::Error;

use crate::fixed::{Fixed, FixedError};
use crate::types::{AccountId, Amount, BlockHeight, Timestamp};

/// Identity parsing errors
#[derive(Debug, Error)]
pub enum IdError {
    #[error("identifier is not hex: {reason}")]
    NotHex { reason: String },

    #[error("identifier must be 32 bytes, got {len}")]
    WrongLength { len: usize },
}

/// Price source errors reported by oracle collaborators
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("price source unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("no observation for asset {asset}")]
    UnknownAsset { asset: String },
}

/// Ledger errors reported by asset and boardroom collaborators
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient balance: need {required}, have {available}")]
    InsufficientBalance { required: Amount, available: Amount },

    #[error("total supply overflow")]
    SupplyOverflow,

    #[error("{holder} does not hold the operator capability")]
    NotOperator { holder: AccountId },
}

/// Treasury operation errors
///
/// Every failed operation leaves treasury state exactly as it was before
/// the call; the reason below is all the caller observes.
#[derive(Debug, Error)]
pub enum TreasuryError {
    #[error("permission denied: {detail}")]
    PermissionDenied { detail: String },

    #[error("treasury has migrated; operations are permanently disabled")]
    AlreadyMigrated,

    #[error("treasury reserve has already been initialized")]
    AlreadyInitialized,

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("cash price {price} exceeds the submitted target {target}")]
    PriceSlippage { price: Fixed, target: Fixed },

    #[error("cash price {price} is not eligible: {requirement}")]
    PriceIneligible { price: Fixed, requirement: String },

    #[error("treasury holds {available} cash, redemption requires {required}")]
    InsufficientTreasuryBalance { required: Amount, available: Amount },

    #[error("oracle consult failed: {message}")]
    OracleConsultFailure { message: String },

    #[error("caller {caller} already entered the treasury at height {height}")]
    ConcurrentCall {
        caller: AccountId,
        height: BlockHeight,
    },

    #[error("operations begin at {start}; current time is {now}")]
    NotYetStarted { start: Timestamp, now: Timestamp },

    #[error("epoch {epoch} has not elapsed; next boundary at {next_at}")]
    EpochNotElapsed { epoch: u64, next_at: Timestamp },

    #[error("arithmetic: {0}")]
    Arithmetic(#[from] FixedError),

    #[error("ledger: {0}")]
    Ledger(#[from] LedgerError),
}

impl TreasuryError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PermissionDenied { .. } => "permission_denied",
            Self::AlreadyMigrated => "already_migrated",
            Self::AlreadyInitialized => "already_initialized",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::PriceSlippage { .. } => "price_slippage",
            Self::PriceIneligible { .. } => "price_ineligible",
            Self::InsufficientTreasuryBalance { .. } => "insufficient_treasury_balance",
            Self::OracleConsultFailure { .. } => "oracle_consult_failure",
            Self::ConcurrentCall { .. } => "concurrent_call",
            Self::NotYetStarted { .. } => "not_yet_started",
            Self::EpochNotElapsed { .. } => "epoch_not_elapsed",
            Self::Arithmetic(_) => "arithmetic",
            Self::Ledger(_) => "ledger",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument { .. } => 400,
            Self::PermissionDenied { .. } => 403,
            Self::AlreadyMigrated | Self::AlreadyInitialized => 409,
            Self::ConcurrentCall { .. } => 409,
            Self::PriceSlippage { .. }
            | Self::PriceIneligible { .. }
            | Self::InsufficientTreasuryBalance { .. }
            | Self::NotYetStarted { .. }
            | Self::EpochNotElapsed { .. } => 422,
            Self::OracleConsultFailure { .. } => 503,
            Self::Arithmetic(_) | Self::Ledger(_) => 500,
        }
    }
}

/// Result type alias for treasury operations
pub type Result<T> = std::result::Result<T, TreasuryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = TreasuryError::AlreadyMigrated;
        assert_eq!(err.error_code(), "already_migrated");
        assert_eq!(err.status_code(), 409);

        let err = TreasuryError::InsufficientTreasuryBalance {
            required: 500,
            available: 100,
        };
        assert_eq!(err.error_code(), "insufficient_treasury_balance");
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_fixed_error_converts() {
        let err: TreasuryError = FixedError::Overflow.into();
        assert_eq!(err.error_code(), "arithmetic");
    }

    #[test]
    fn test_price_errors_render_prices() {
        let err = TreasuryError::PriceSlippage {
            price: Fixed::from_ratio(9, 10).unwrap(),
            target: Fixed::from_ratio(8, 10).unwrap(),
        };
        assert_eq!(err.to_string(), "cash price 0.9 exceeds the submitted target 0.8");
    }
}
