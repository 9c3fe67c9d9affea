//! Treasury Policy Calculator
//!
//! Pure math functions for conversion budgets, bond payouts, and
//! seigniorage. No I/O, no collaborator calls - just deterministic
//! calculations.
//!
//! # Units
//!
//! - Token amounts: base units (u128), 1 cash = 10^9 base units
//! - Prices and ratios: `Fixed` at 10^18 scale
//! - Every division truncates toward zero; the treasury keeps remainders

use bulwark_core::{Amount, Fixed, FixedError};

/// Supply in public hands: total cash minus the treasury's own
/// redemption reserve.
pub fn circulating_supply(total_cash_supply: Amount, redemption_reserve: Amount) -> Amount {
    total_cash_supply.saturating_sub(redemption_reserve)
}

/// Per-epoch budget of cash eligible for bond conversion.
///
/// `supply * (peg - price)`, zero when the price is at or above peg.
pub fn conversion_limit(
    circulating_supply: Amount,
    cash_peg: Fixed,
    cash_price: Fixed,
) -> Result<Amount, FixedError> {
    if cash_price >= cash_peg {
        return Ok(0);
    }
    let percentage = cash_peg.checked_sub(cash_price)?;
    percentage.scale_amount(circulating_supply)
}

/// Bond face value minted for `cash_amount` burned at `cash_price`.
///
/// `cash_amount / price`: a deeper discount yields proportionally more
/// face value.
pub fn bond_payout(cash_amount: Amount, cash_price: Fixed) -> Result<Amount, FixedError> {
    cash_price.divide_amount(cash_amount)
}

/// Cash minted for stakers when the market trades above the ceiling.
///
/// `supply * (price - peg)`, zero when the price is at or below peg.
pub fn seigniorage_amount(
    circulating_supply: Amount,
    cash_peg: Fixed,
    cash_price: Fixed,
) -> Result<Amount, FixedError> {
    if cash_price <= cash_peg {
        return Ok(0);
    }
    let percentage = cash_price.checked_sub(cash_peg)?;
    percentage.scale_amount(circulating_supply)
}
