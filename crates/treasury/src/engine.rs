//! Treasury State Machine
//!
//! Owns all policy state and composes the oracle, curve, asset, and
//! boardroom collaborators into the public operations. Every operation is
//! atomic: all preconditions and fail-closed collaborator reads run before
//! any effect, so a failed call leaves state exactly as it was.
//!
//! Collaborator contract: balances and capabilities are re-checked
//! immediately before transfers begin, so a conforming collaborator cannot
//! fail once effects have started.

use serde::{Deserialize, Serialize};

use bulwark_core::constants::UNIT;
use bulwark_core::{
    AccountId, Amount, CallContext, Fixed, FixedError, Result, Timestamp, TreasuryError,
};

use crate::calculator;
use crate::collaborators::{AssetRef, BoardroomRef, CurveRef};
use crate::events::{EventRecord, TreasuryEvent};
use crate::guards::{BlockGuard, EpochClock};
use crate::oracle::{consult_price, refresh, OracleRef};
use crate::state::{TreasuryState, TreasuryStatus};

/// Construction parameters; every reference is fixed at deployment and
/// leaves only through `migrate` or the governance setters.
pub struct TreasuryParams {
    /// The treasury's own ledger identity
    pub account: AccountId,
    /// Administrative identity allowed to migrate and swap collaborators
    pub operator: AccountId,
    pub cash: AssetRef,
    pub bond: AssetRef,
    pub share: AssetRef,
    pub bond_oracle: OracleRef,
    pub seigniorage_oracle: OracleRef,
    pub curve: CurveRef,
    pub boardroom: BoardroomRef,
    pub start_time: Timestamp,
    pub epoch_period: u64,
}

/// Result of a bond purchase (or a preview of one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondPurchase {
    /// Cash burned from the caller, clamped to the window budget
    pub cash_burned: Amount,
    /// Bond face value minted to the caller
    pub bonds_minted: Amount,
}

/// Conversion-limit window values staged for commit.
struct Window {
    epoch: u64,
    limit: Amount,
    accumulated: Amount,
}

/// The monetary-policy engine.
pub struct Treasury {
    account: AccountId,
    operator: AccountId,
    cash: AssetRef,
    bond: AssetRef,
    share: AssetRef,
    bond_oracle: OracleRef,
    seigniorage_oracle: OracleRef,
    curve: CurveRef,
    boardroom: BoardroomRef,
    clock: EpochClock,
    guard: BlockGuard,
    state: TreasuryState,
    events: Vec<EventRecord>,
}

impl Treasury {
    pub fn new(params: TreasuryParams) -> Self {
        Self {
            account: params.account,
            operator: params.operator,
            cash: params.cash,
            bond: params.bond,
            share: params.share,
            bond_oracle: params.bond_oracle,
            seigniorage_oracle: params.seigniorage_oracle,
            curve: params.curve,
            boardroom: params.boardroom,
            clock: EpochClock::new(params.start_time, params.epoch_period),
            guard: BlockGuard::new(),
            state: TreasuryState::new(),
            events: Vec::new(),
        }
    }

    // ---- read-only queries ----

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn state(&self) -> &TreasuryState {
        &self.state
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn epoch(&self) -> u64 {
        self.clock.current_epoch()
    }

    /// Treasury-held cash earmarked for bond redemption.
    pub fn reserve(&self) -> Amount {
        self.state.accumulated_seigniorage
    }

    /// Cash in public hands: total supply minus the redemption reserve.
    pub fn circulating_supply(&self) -> Amount {
        calculator::circulating_supply(self.cash.total_supply(), self.state.accumulated_seigniorage)
    }

    /// Current policy ceiling; always recomputed, never cached.
    pub fn ceiling_price(&self) -> Fixed {
        self.curve.calc_ceiling(self.circulating_supply())
    }

    pub fn bond_oracle_price(&self) -> Result<Fixed> {
        consult_price(self.bond_oracle.as_ref(), &self.cash.id(), UNIT)
    }

    pub fn seigniorage_oracle_price(&self) -> Result<Fixed> {
        consult_price(self.seigniorage_oracle.as_ref(), &self.cash.id(), UNIT)
    }

    /// Aggregate snapshot for API responses. Fail-closed on oracle reads.
    pub fn status(&self) -> Result<TreasuryStatus> {
        let bond_price = self.bond_oracle_price()?;
        let seigniorage_price = self.seigniorage_oracle_price()?;
        let circulating = self.circulating_supply();
        let ceiling = self.curve.calc_ceiling(circulating);
        let treasury_cash = self.cash.balance_of(&self.account);

        Ok(TreasuryStatus {
            cash_asset: self.cash.id(),
            bond_asset: self.bond.id(),
            share_asset: self.share.id(),
            bond_oracle: self.bond_oracle.describe(),
            seigniorage_oracle: self.seigniorage_oracle.describe(),
            ceiling_curve: self.curve.describe(),
            boardroom: self.boardroom.describe(),
            cash_peg: self.state.cash_peg,
            bond_oracle_price: bond_price,
            seigniorage_oracle_price: seigniorage_price,
            ceiling_price: ceiling,
            circulating_supply: circulating,
            treasury_cash,
            redemption_reserve: self.state.accumulated_seigniorage,
            conversion_budget_remaining: self.state.conversion_budget_remaining(),
            epoch: self.clock.current_epoch(),
            next_epoch_point: self.clock.next_epoch_point(),
            initialized: self.state.initialized,
            migrated: self.state.migrated,
            can_buy_bonds: !self.state.migrated && bond_price < self.state.cash_peg,
            can_redeem_bonds: !self.state.migrated && bond_price > ceiling && treasury_cash > 0,
        })
    }

    // ---- lifecycle ----

    /// One-time reserve snapshot: the cash the treasury already holds at
    /// initialization becomes the redemption reserve.
    pub fn initialize(&mut self, ctx: &CallContext) -> Result<Amount> {
        self.check_not_migrated()?;
        self.clock.check_started(ctx.timestamp)?;
        self.check_operator_capability()?;

        if self.state.initialized {
            return Err(TreasuryError::AlreadyInitialized);
        }

        let reserve = self.cash.balance_of(&self.account);
        self.state.accumulated_seigniorage = reserve;
        self.state.initialized = true;

        self.push_event(ctx.timestamp, TreasuryEvent::Initialized { reserve });
        tracing::info!(reserve, "treasury initialized");
        Ok(reserve)
    }

    /// Irreversibly hand every capability and balance to a successor.
    pub fn migrate(&mut self, ctx: &CallContext, target: &AccountId) -> Result<()> {
        self.require_operator(ctx)?;
        self.check_not_migrated()?;
        self.clock.check_started(ctx.timestamp)?;
        self.check_operator_capability()?;

        for asset in [&self.cash, &self.bond, &self.share] {
            asset.transfer_operator(&self.account, target)?;
            asset.transfer_ownership(&self.account, target)?;

            let balance = asset.balance_of(&self.account);
            if balance > 0 {
                asset.transfer(&self.account, target, balance)?;
            }
        }

        self.state.migrated = true;

        self.push_event(
            ctx.timestamp,
            TreasuryEvent::Migration {
                target: target.clone(),
            },
        );
        tracing::info!(target = %target, "treasury migrated");
        Ok(())
    }

    pub fn set_bond_oracle(&mut self, ctx: &CallContext, oracle: OracleRef) -> Result<()> {
        self.require_operator(ctx)?;
        self.check_not_migrated()?;

        let old = self.bond_oracle.describe();
        let new = oracle.describe();
        self.bond_oracle = oracle;

        self.push_event(ctx.timestamp, TreasuryEvent::BondOracleChanged { old, new });
        Ok(())
    }

    pub fn set_seigniorage_oracle(&mut self, ctx: &CallContext, oracle: OracleRef) -> Result<()> {
        self.require_operator(ctx)?;
        self.check_not_migrated()?;

        let old = self.seigniorage_oracle.describe();
        let new = oracle.describe();
        self.seigniorage_oracle = oracle;

        self.push_event(
            ctx.timestamp,
            TreasuryEvent::SeigniorageOracleChanged { old, new },
        );
        Ok(())
    }

    pub fn set_ceiling_curve(&mut self, ctx: &CallContext, curve: CurveRef) -> Result<()> {
        self.require_operator(ctx)?;
        self.check_not_migrated()?;

        let old = self.curve.describe();
        let new = curve.describe();
        self.curve = curve;

        self.push_event(
            ctx.timestamp,
            TreasuryEvent::CeilingCurveChanged { old, new },
        );
        Ok(())
    }

    // ---- operations ----

    /// Exchange cash for discounted bonds while the price is below peg.
    ///
    /// The purchase is clamped to the window budget; a fully exhausted
    /// budget yields success with zero effect so callers can probe the
    /// remaining budget without failing.
    pub fn buy_bonds(
        &mut self,
        ctx: &CallContext,
        amount: Amount,
        target_price: Fixed,
    ) -> Result<BondPurchase> {
        self.check_not_migrated()?;
        self.clock.check_started(ctx.timestamp)?;
        self.check_operator_capability()?;
        self.guard.check(&ctx.caller, ctx.height)?;

        if amount == 0 {
            return Err(TreasuryError::InvalidArgument {
                reason: "cannot purchase bonds with zero amount".to_string(),
            });
        }

        self.refresh_oracles(ctx.timestamp);

        let cash_price = self.bond_oracle_price()?;
        if cash_price > target_price {
            return Err(TreasuryError::PriceSlippage {
                price: cash_price,
                target: target_price,
            });
        }
        if cash_price >= self.state.cash_peg {
            return Err(TreasuryError::PriceIneligible {
                price: cash_price,
                requirement: format!("bonds sell only below the {} peg", self.state.cash_peg),
            });
        }

        let window = self.rolled_window(cash_price, ctx.timestamp)?;
        let effective = amount.min(window.limit.saturating_sub(window.accumulated));

        if effective == 0 {
            // Budget exhausted: success with no purchase
            self.commit_window(&window, 0)?;
            self.guard.enter(&ctx.caller, ctx.height);
            return Ok(BondPurchase {
                cash_burned: 0,
                bonds_minted: 0,
            });
        }

        let bonds = calculator::bond_payout(effective, cash_price)?;

        let balance = self.cash.balance_of(&ctx.caller);
        if balance < effective {
            return Err(bulwark_core::LedgerError::InsufficientBalance {
                required: effective,
                available: balance,
            }
            .into());
        }

        self.cash.burn_from(&ctx.caller, effective)?;
        self.bond.mint(&ctx.caller, bonds)?;

        self.commit_window(&window, effective)?;
        self.guard.enter(&ctx.caller, ctx.height);
        self.push_event(
            ctx.timestamp,
            TreasuryEvent::BoughtBonds {
                caller: ctx.caller.clone(),
                cash_burned: effective,
                bonds_minted: bonds,
            },
        );
        tracing::info!(
            caller = %ctx.caller,
            cash_burned = effective,
            bonds_minted = bonds,
            price = %cash_price,
            "bonds purchased"
        );

        Ok(BondPurchase {
            cash_burned: effective,
            bonds_minted: bonds,
        })
    }

    /// Compute what `buy_bonds` would do right now, without mutating.
    pub fn preview_buy_bonds(
        &self,
        amount: Amount,
        target_price: Fixed,
        now: Timestamp,
    ) -> Result<BondPurchase> {
        if amount == 0 {
            return Err(TreasuryError::InvalidArgument {
                reason: "cannot purchase bonds with zero amount".to_string(),
            });
        }

        let cash_price = self.bond_oracle_price()?;
        if cash_price > target_price {
            return Err(TreasuryError::PriceSlippage {
                price: cash_price,
                target: target_price,
            });
        }
        if cash_price >= self.state.cash_peg {
            return Err(TreasuryError::PriceIneligible {
                price: cash_price,
                requirement: format!("bonds sell only below the {} peg", self.state.cash_peg),
            });
        }

        let window = self.rolled_window(cash_price, now)?;
        let effective = amount.min(window.limit.saturating_sub(window.accumulated));
        let bonds = if effective == 0 {
            0
        } else {
            calculator::bond_payout(effective, cash_price)?
        };

        Ok(BondPurchase {
            cash_burned: effective,
            bonds_minted: bonds,
        })
    }

    /// Redeem bonds for cash 1:1 while the price is above the ceiling.
    /// No partial fill: the treasury either pays in full or the call fails.
    pub fn redeem_bonds(&mut self, ctx: &CallContext, amount: Amount) -> Result<()> {
        self.check_not_migrated()?;
        self.clock.check_started(ctx.timestamp)?;
        self.check_operator_capability()?;
        self.guard.check(&ctx.caller, ctx.height)?;

        if amount == 0 {
            return Err(TreasuryError::InvalidArgument {
                reason: "cannot redeem zero bonds".to_string(),
            });
        }

        self.refresh_oracles(ctx.timestamp);

        let cash_price = self.bond_oracle_price()?;
        let ceiling = self.ceiling_price();
        if cash_price <= ceiling {
            return Err(TreasuryError::PriceIneligible {
                price: cash_price,
                requirement: format!("redemption requires the price above the {} ceiling", ceiling),
            });
        }

        let treasury_cash = self.cash.balance_of(&self.account);
        if treasury_cash < amount {
            return Err(TreasuryError::InsufficientTreasuryBalance {
                required: amount,
                available: treasury_cash,
            });
        }

        let caller_bonds = self.bond.balance_of(&ctx.caller);
        if caller_bonds < amount {
            return Err(bulwark_core::LedgerError::InsufficientBalance {
                required: amount,
                available: caller_bonds,
            }
            .into());
        }

        self.bond.burn_from(&ctx.caller, amount)?;
        self.cash.transfer(&self.account, &ctx.caller, amount)?;

        // Reserve accounting never goes negative
        self.state.accumulated_seigniorage -= self.state.accumulated_seigniorage.min(amount);

        self.guard.enter(&ctx.caller, ctx.height);
        self.push_event(
            ctx.timestamp,
            TreasuryEvent::RedeemedBonds {
                caller: ctx.caller.clone(),
                bonds_burned: amount,
                cash_paid: amount,
            },
        );
        tracing::info!(
            caller = %ctx.caller,
            amount,
            price = %cash_price,
            "bonds redeemed"
        );

        Ok(())
    }

    /// Once per epoch, mint seigniorage for stakers when the market trades
    /// above the ceiling. A quiet market still consumes the epoch so the
    /// policy clock stays live.
    pub fn allocate_seigniorage(&mut self, ctx: &CallContext) -> Result<Amount> {
        self.check_not_migrated()?;
        self.clock.check_started(ctx.timestamp)?;
        self.clock.check_elapsed(ctx.timestamp)?;
        self.check_operator_capability()?;
        self.guard.check(&ctx.caller, ctx.height)?;

        self.refresh_oracles(ctx.timestamp);

        let cash_price = self.seigniorage_oracle_price()?;
        let circulating = self.circulating_supply();
        let ceiling = self.curve.calc_ceiling(circulating);

        let seigniorage = if cash_price <= ceiling {
            0
        } else {
            calculator::seigniorage_amount(circulating, self.state.cash_peg, cash_price)?
        };

        if seigniorage == 0 {
            let epoch = self.clock.advance();
            self.guard.enter(&ctx.caller, ctx.height);
            tracing::info!(epoch, price = %cash_price, "quiet market, epoch consumed");
            return Ok(0);
        }

        self.cash.mint(&self.account, seigniorage)?;
        self.cash
            .transfer(&self.account, &self.boardroom.account(), seigniorage)?;
        self.boardroom.allocate_seigniorage(seigniorage)?;

        let epoch = self.clock.advance();
        self.guard.enter(&ctx.caller, ctx.height);
        self.push_event(ctx.timestamp, TreasuryEvent::BoardroomFunded { seigniorage });
        tracing::info!(
            epoch,
            seigniorage,
            price = %cash_price,
            "seigniorage allocated to boardroom"
        );

        Ok(seigniorage)
    }

    // ---- internals ----

    fn check_not_migrated(&self) -> Result<()> {
        if self.state.migrated {
            return Err(TreasuryError::AlreadyMigrated);
        }
        Ok(())
    }

    /// The caller must be the treasury's administrative operator.
    fn require_operator(&self, ctx: &CallContext) -> Result<()> {
        if ctx.caller != self.operator {
            return Err(TreasuryError::PermissionDenied {
                detail: format!("caller {} is not the treasury operator", ctx.caller),
            });
        }
        Ok(())
    }

    /// The treasury must currently hold the operator capability over all
    /// three assets and the boardroom. Re-verified on every mutating call.
    fn check_operator_capability(&self) -> Result<()> {
        let checks = [
            ("cash asset", self.cash.operator()),
            ("bond asset", self.bond.operator()),
            ("share asset", self.share.operator()),
            ("boardroom", self.boardroom.operator()),
        ];
        for (name, operator) in checks {
            if operator != self.account {
                return Err(TreasuryError::PermissionDenied {
                    detail: format!("treasury does not operate the {}", name),
                });
            }
        }
        Ok(())
    }

    /// Best-effort refresh of both oracles; errors never surface.
    fn refresh_oracles(&self, now: Timestamp) {
        refresh(self.bond_oracle.as_ref(), now);
        refresh(self.seigniorage_oracle.as_ref(), now);
    }

    /// Stage the conversion-limit window for this call. Recomputed at most
    /// once per bond-oracle epoch; within the epoch the committed values
    /// carry over.
    fn rolled_window(&self, cash_price: Fixed, now: Timestamp) -> Result<Window> {
        let oracle_epoch = self.bond_oracle.current_epoch(now);
        if oracle_epoch > self.state.last_bond_oracle_epoch {
            let limit = calculator::conversion_limit(
                self.circulating_supply(),
                self.state.cash_peg,
                cash_price,
            )?;
            tracing::debug!(oracle_epoch, limit, "conversion window recomputed");
            Ok(Window {
                epoch: oracle_epoch,
                limit,
                accumulated: 0,
            })
        } else {
            Ok(Window {
                epoch: self.state.last_bond_oracle_epoch,
                limit: self.state.cash_conversion_limit,
                accumulated: self.state.accumulated_cash_conversion,
            })
        }
    }

    fn commit_window(&mut self, window: &Window, converted: Amount) -> Result<()> {
        let accumulated = window
            .accumulated
            .checked_add(converted)
            .ok_or(FixedError::Overflow)?;
        self.state.last_bond_oracle_epoch = window.epoch;
        self.state.cash_conversion_limit = window.limit;
        self.state.accumulated_cash_conversion = accumulated;
        Ok(())
    }

    fn push_event(&mut self, timestamp: Timestamp, event: TreasuryEvent) {
        self.events.push(EventRecord::new(timestamp, event));
    }
}
