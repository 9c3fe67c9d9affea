//! In-Memory Reference Collaborators
//!
//! Ledger-backed implementations of the collaborator traits, used by the
//! app binary for a simulated deployment and by scenario tests. The real
//! deployment substitutes ledger-native collaborators behind the same
//! traits.

use std::collections::HashMap;

use parking_lot::RwLock;

use bulwark_core::constants::UNIT;
use bulwark_core::{AccountId, Amount, AssetId, Fixed, LedgerError, OracleError, Timestamp};

use crate::collaborators::{Asset, Boardroom, CeilingCurve};
use crate::oracle::PriceOracle;

/// A token with simple balance bookkeeping and operator/owner capabilities.
pub struct MemoryAsset {
    id: AssetId,
    inner: RwLock<Ledger>,
}

struct Ledger {
    balances: HashMap<AccountId, Amount>,
    total_supply: Amount,
    operator: AccountId,
    owner: AccountId,
}

impl MemoryAsset {
    /// Create an asset whose operator and owner capabilities are both held
    /// by `authority`.
    pub fn new(id: AssetId, authority: AccountId) -> Self {
        Self {
            id,
            inner: RwLock::new(Ledger {
                balances: HashMap::new(),
                total_supply: 0,
                operator: authority.clone(),
                owner: authority,
            }),
        }
    }

    pub fn owner(&self) -> AccountId {
        self.inner.read().owner.clone()
    }
}

impl Asset for MemoryAsset {
    fn id(&self) -> AssetId {
        self.id.clone()
    }

    fn total_supply(&self) -> Amount {
        self.inner.read().total_supply
    }

    fn balance_of(&self, who: &AccountId) -> Amount {
        self.inner.read().balances.get(who).copied().unwrap_or(0)
    }

    fn operator(&self) -> AccountId {
        self.inner.read().operator.clone()
    }

    fn mint(&self, to: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        let mut ledger = self.inner.write();
        let supply = ledger
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;
        ledger.total_supply = supply;
        *ledger.balances.entry(to.clone()).or_insert(0) += amount;
        Ok(())
    }

    fn burn_from(&self, from: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        let mut ledger = self.inner.write();
        let balance = ledger.balances.get(from).copied().unwrap_or(0);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available: balance,
            });
        }
        ledger.balances.insert(from.clone(), balance - amount);
        ledger.total_supply -= amount;
        Ok(())
    }

    fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let mut ledger = self.inner.write();
        let balance = ledger.balances.get(from).copied().unwrap_or(0);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available: balance,
            });
        }
        ledger.balances.insert(from.clone(), balance - amount);
        *ledger.balances.entry(to.clone()).or_insert(0) += amount;
        Ok(())
    }

    fn transfer_operator(&self, from: &AccountId, to: &AccountId) -> Result<(), LedgerError> {
        let mut ledger = self.inner.write();
        if ledger.operator != *from {
            return Err(LedgerError::NotOperator {
                holder: from.clone(),
            });
        }
        ledger.operator = to.clone();
        Ok(())
    }

    fn transfer_ownership(&self, from: &AccountId, to: &AccountId) -> Result<(), LedgerError> {
        let mut ledger = self.inner.write();
        if ledger.owner != *from {
            return Err(LedgerError::NotOperator {
                holder: from.clone(),
            });
        }
        ledger.owner = to.clone();
        Ok(())
    }
}

/// A settable price source with its own refresh period and epoch index.
pub struct MemoryOracle {
    name: String,
    asset: AssetId,
    start_time: Timestamp,
    period: u64,
    inner: RwLock<OracleInner>,
}

struct OracleInner {
    price: Fixed,
    last_update: Timestamp,
    failing: bool,
    updates: u64,
}

impl MemoryOracle {
    pub fn new(
        name: impl Into<String>,
        asset: AssetId,
        price: Fixed,
        start_time: Timestamp,
        period: u64,
    ) -> Self {
        Self {
            name: name.into(),
            asset,
            start_time,
            period,
            inner: RwLock::new(OracleInner {
                price,
                last_update: start_time,
                failing: false,
                updates: 0,
            }),
        }
    }

    pub fn set_price(&self, price: Fixed) {
        self.inner.write().price = price;
    }

    /// Make every consult and update fail until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.inner.write().failing = failing;
    }

    pub fn update_count(&self) -> u64 {
        self.inner.read().updates
    }
}

impl PriceOracle for MemoryOracle {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn consult(&self, asset: &AssetId, unit: Amount) -> Result<Fixed, OracleError> {
        let inner = self.inner.read();
        if inner.failing {
            return Err(OracleError::Unavailable {
                reason: "simulated outage".to_string(),
            });
        }
        if *asset != self.asset {
            return Err(OracleError::UnknownAsset {
                asset: asset.to_string(),
            });
        }
        if unit == UNIT {
            return Ok(inner.price);
        }
        // Price is quoted per whole token; scale to the requested unit
        Ok(Fixed::from_raw(
            (inner.price.raw() / UNIT).saturating_mul(unit),
        ))
    }

    fn update(&self, now: Timestamp) -> Result<(), OracleError> {
        let mut inner = self.inner.write();
        if inner.failing {
            return Err(OracleError::Unavailable {
                reason: "simulated outage".to_string(),
            });
        }
        inner.last_update = now;
        inner.updates += 1;
        Ok(())
    }

    fn callable(&self, now: Timestamp) -> bool {
        now >= self.inner.read().last_update + self.period
    }

    fn current_epoch(&self, now: Timestamp) -> u64 {
        if self.period == 0 {
            return 0;
        }
        now.saturating_sub(self.start_time) / self.period
    }
}

/// Supply-independent ceiling, the simplest monotonic curve.
pub struct FixedCeilingCurve {
    ceiling: Fixed,
}

impl FixedCeilingCurve {
    pub fn new(ceiling: Fixed) -> Self {
        Self { ceiling }
    }
}

impl CeilingCurve for FixedCeilingCurve {
    fn describe(&self) -> String {
        format!("constant ceiling {}", self.ceiling)
    }

    fn calc_ceiling(&self, _circulating_supply: Amount) -> Fixed {
        self.ceiling
    }
}

/// Records received seigniorage instead of distributing it.
pub struct MemoryBoardroom {
    name: String,
    account: AccountId,
    inner: RwLock<BoardroomInner>,
}

struct BoardroomInner {
    operator: AccountId,
    total_funded: Amount,
    allocations: Vec<Amount>,
}

impl MemoryBoardroom {
    pub fn new(name: impl Into<String>, account: AccountId, operator: AccountId) -> Self {
        Self {
            name: name.into(),
            account,
            inner: RwLock::new(BoardroomInner {
                operator,
                total_funded: 0,
                allocations: Vec::new(),
            }),
        }
    }

    pub fn total_funded(&self) -> Amount {
        self.inner.read().total_funded
    }

    pub fn allocation_count(&self) -> usize {
        self.inner.read().allocations.len()
    }
}

impl Boardroom for MemoryBoardroom {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn operator(&self) -> AccountId {
        self.inner.read().operator.clone()
    }

    fn account(&self) -> AccountId {
        self.account.clone()
    }

    fn allocate_seigniorage(&self, amount: Amount) -> Result<(), LedgerError> {
        let mut inner = self.inner.write();
        inner.total_funded = inner
            .total_funded
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;
        inner.allocations.push(amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn treasury_account() -> AccountId {
        AccountId::new("ee".repeat(32))
    }

    fn alice() -> AccountId {
        AccountId::new("a1".repeat(32))
    }

    fn cash_id() -> AssetId {
        AssetId::new("ca".repeat(32))
    }

    #[test]
    fn test_asset_mint_burn_transfer() {
        let asset = MemoryAsset::new(cash_id(), treasury_account());

        asset.mint(&alice(), 1_000).unwrap();
        assert_eq!(asset.balance_of(&alice()), 1_000);
        assert_eq!(asset.total_supply(), 1_000);

        asset.transfer(&alice(), &treasury_account(), 400).unwrap();
        assert_eq!(asset.balance_of(&alice()), 600);
        assert_eq!(asset.balance_of(&treasury_account()), 400);

        asset.burn_from(&alice(), 600).unwrap();
        assert_eq!(asset.balance_of(&alice()), 0);
        assert_eq!(asset.total_supply(), 400);
    }

    #[test]
    fn test_asset_burn_more_than_balance_fails() {
        let asset = MemoryAsset::new(cash_id(), treasury_account());
        asset.mint(&alice(), 10).unwrap();

        let err = asset.burn_from(&alice(), 11).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(asset.balance_of(&alice()), 10);
    }

    #[test]
    fn test_operator_capability_transfer() {
        let asset = MemoryAsset::new(cash_id(), treasury_account());
        assert_eq!(asset.operator(), treasury_account());

        // Only the holder can hand it over
        assert!(asset.transfer_operator(&alice(), &alice()).is_err());

        asset
            .transfer_operator(&treasury_account(), &alice())
            .unwrap();
        assert_eq!(asset.operator(), alice());
    }

    #[test]
    fn test_oracle_epoch_tracks_period() {
        let oracle = MemoryOracle::new("bond oracle", cash_id(), Fixed::ONE, 1_000, 100);
        assert_eq!(oracle.current_epoch(999), 0);
        assert_eq!(oracle.current_epoch(1_000), 0);
        assert_eq!(oracle.current_epoch(1_100), 1);
        assert_eq!(oracle.current_epoch(1_350), 3);
    }

    #[test]
    fn test_boardroom_records_allocations() {
        let boardroom =
            MemoryBoardroom::new("boardroom", AccountId::new("bb".repeat(32)), treasury_account());
        boardroom.allocate_seigniorage(100).unwrap();
        boardroom.allocate_seigniorage(50).unwrap();
        assert_eq!(boardroom.total_funded(), 150);
        assert_eq!(boardroom.allocation_count(), 2);
    }
}
