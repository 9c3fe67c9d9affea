//! Treasury State
//!
//! The persisted policy counters, and the aggregate status snapshot the
//! API serves.

use serde::{Deserialize, Serialize};

use bulwark_core::{Amount, AssetId, Fixed, Timestamp};

use crate::constants::params;

/// Persisted policy state, mutated only through the engine's operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasuryState {
    /// Terminal once true; set by `migrate`
    pub migrated: bool,

    /// Set once by the one-time reserve snapshot
    pub initialized: bool,

    /// Target price; fixed for the lifetime of the treasury
    pub cash_peg: Fixed,

    /// Bond-oracle epoch at which the conversion window was last recomputed
    pub last_bond_oracle_epoch: u64,

    /// Budget of cash eligible for bond conversion this window
    pub cash_conversion_limit: Amount,

    /// Cash already converted to bonds within the current window
    pub accumulated_cash_conversion: Amount,

    /// Treasury-held cash earmarked for bond redemption. Populated only by
    /// the `initialize` snapshot and only ever decreased by redemptions;
    /// freshly minted seigniorage never lands here.
    pub accumulated_seigniorage: Amount,
}

impl TreasuryState {
    pub fn new() -> Self {
        Self {
            migrated: false,
            initialized: false,
            cash_peg: params::CASH_PEG,
            last_bond_oracle_epoch: 0,
            cash_conversion_limit: 0,
            accumulated_cash_conversion: 0,
            accumulated_seigniorage: 0,
        }
    }

    /// Budget still available for bond conversion this window.
    pub fn conversion_budget_remaining(&self) -> Amount {
        self.cash_conversion_limit
            .saturating_sub(self.accumulated_cash_conversion)
    }
}

impl Default for TreasuryState {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate treasury status for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasuryStatus {
    // Managed assets
    pub cash_asset: AssetId,
    pub bond_asset: AssetId,
    pub share_asset: AssetId,

    // Collaborators
    pub bond_oracle: String,
    pub seigniorage_oracle: String,
    pub ceiling_curve: String,
    pub boardroom: String,

    // Prices
    pub cash_peg: Fixed,
    pub bond_oracle_price: Fixed,
    pub seigniorage_oracle_price: Fixed,
    pub ceiling_price: Fixed,

    // Supply and budgets
    pub circulating_supply: Amount,
    pub treasury_cash: Amount,
    pub redemption_reserve: Amount,
    pub conversion_budget_remaining: Amount,

    // Policy clock
    pub epoch: u64,
    pub next_epoch_point: Timestamp,

    // Lifecycle
    pub initialized: bool,
    pub migrated: bool,

    // Action availability
    pub can_buy_bonds: bool,
    pub can_redeem_bonds: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_zeroed() {
        let state = TreasuryState::new();
        assert!(!state.migrated);
        assert!(!state.initialized);
        assert_eq!(state.cash_peg, Fixed::ONE);
        assert_eq!(state.accumulated_seigniorage, 0);
        assert_eq!(state.conversion_budget_remaining(), 0);
    }

    #[test]
    fn test_conversion_budget_remaining_saturates() {
        let mut state = TreasuryState::new();
        state.cash_conversion_limit = 100;
        state.accumulated_cash_conversion = 40;
        assert_eq!(state.conversion_budget_remaining(), 60);

        // Never negative even if counters drift in tests
        state.accumulated_cash_conversion = 150;
        assert_eq!(state.conversion_budget_remaining(), 0);
    }
}
