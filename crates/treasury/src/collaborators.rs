//! Collaborator Interfaces
//!
//! The treasury owns no ledger of its own. Token accounting, reward
//! distribution, and the ceiling curve live behind these traits; the
//! engine re-verifies the capabilities it needs on every mutating call
//! instead of trusting cached state.

use std::sync::Arc;

use bulwark_core::{AccountId, Amount, AssetId, Fixed, LedgerError};

/// A managed token: mint/burn/transfer accounting plus the operator
/// capability the treasury must hold to administer it.
pub trait Asset: Send + Sync {
    fn id(&self) -> AssetId;

    fn total_supply(&self) -> Amount;

    fn balance_of(&self, who: &AccountId) -> Amount;

    /// Identity currently holding the operator capability
    fn operator(&self) -> AccountId;

    fn mint(&self, to: &AccountId, amount: Amount) -> Result<(), LedgerError>;

    fn burn_from(&self, from: &AccountId, amount: Amount) -> Result<(), LedgerError>;

    fn transfer(&self, from: &AccountId, to: &AccountId, amount: Amount)
        -> Result<(), LedgerError>;

    /// Hand the operator capability to a successor. Only the current
    /// operator may do this.
    fn transfer_operator(&self, from: &AccountId, to: &AccountId) -> Result<(), LedgerError>;

    /// Hand ownership to a successor. Only the current owner may do this.
    fn transfer_ownership(&self, from: &AccountId, to: &AccountId) -> Result<(), LedgerError>;
}

/// Reward distributor for the share asset's stakers.
pub trait Boardroom: Send + Sync {
    /// Short description used in audit records
    fn describe(&self) -> String;

    /// Identity currently holding the boardroom's operator capability
    fn operator(&self) -> AccountId;

    /// Ledger account the boardroom receives funding on
    fn account(&self) -> AccountId;

    /// Record `amount` of freshly transferred cash for pro-rata
    /// distribution to stakers.
    fn allocate_seigniorage(&self, amount: Amount) -> Result<(), LedgerError>;
}

/// Policy ceiling as a function of circulating supply.
///
/// Opaque and collaborator-owned; the treasury never caches the result.
pub trait CeilingCurve: Send + Sync {
    /// Short description used in audit records
    fn describe(&self) -> String;

    fn calc_ceiling(&self, circulating_supply: Amount) -> Fixed;
}

/// Shared handle types the engine stores
pub type AssetRef = Arc<dyn Asset>;
pub type BoardroomRef = Arc<dyn Boardroom>;
pub type CurveRef = Arc<dyn CeilingCurve>;
