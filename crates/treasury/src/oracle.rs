//! Price Oracle Adapter
//!
//! Wraps an external price source behind two call disciplines that must
//! never be merged:
//!
//! - [`consult_price`] is fail-closed: price correctness is safety-critical,
//!   so any error aborts the whole calling operation.
//! - [`refresh`] is fail-open: a best-effort cache refresh whose errors are
//!   logged and swallowed, never surfaced to the caller.

use std::sync::Arc;

use bulwark_core::{Amount, AssetId, Fixed, OracleError, Timestamp, TreasuryError};

/// External price source consumed by the treasury.
pub trait PriceOracle: Send + Sync {
    /// Short description used in audit records
    fn describe(&self) -> String;

    /// Price of `unit` base units of `asset`, at 10^18 scale.
    fn consult(&self, asset: &AssetId, unit: Amount) -> Result<Fixed, OracleError>;

    /// Refresh the oracle's own observation cache.
    fn update(&self, now: Timestamp) -> Result<(), OracleError>;

    /// Whether the oracle's own refresh period has elapsed.
    fn callable(&self, now: Timestamp) -> bool;

    /// The oracle's current epoch index. The conversion-limit window
    /// resets once per bond-oracle epoch.
    fn current_epoch(&self, now: Timestamp) -> u64;
}

/// Shared handle type the engine stores
pub type OracleRef = Arc<dyn PriceOracle>;

/// Fail-closed read: any oracle error aborts the calling operation.
pub fn consult_price(
    oracle: &dyn PriceOracle,
    asset: &AssetId,
    unit: Amount,
) -> Result<Fixed, TreasuryError> {
    oracle
        .consult(asset, unit)
        .map_err(|e| TreasuryError::OracleConsultFailure {
            message: e.to_string(),
        })
}

/// Fail-open refresh: invoked only when the oracle reports itself
/// callable; errors are logged and discarded.
pub fn refresh(oracle: &dyn PriceOracle, now: Timestamp) {
    if !oracle.callable(now) {
        return;
    }
    if let Err(e) = oracle.update(now) {
        tracing::warn!(oracle = %oracle.describe(), "oracle refresh failed, ignored: {}", e);
    }
}
