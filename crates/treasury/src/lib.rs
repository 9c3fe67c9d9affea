//! Treasury Policy Engine
//!
//! This crate implements the monetary-policy engine of the Bulwark two-token
//! stablecoin: a pegged cash asset, a discount bond asset that absorbs
//! below-peg supply, and a share asset that receives above-peg seigniorage
//! through the boardroom.
//!
//! # Protocol Overview
//!
//! The treasury decides, at each caller-triggered operation, whether cash may
//! be exchanged for discounted bonds, whether bonds may be redeemed for cash,
//! and how much newly minted cash should be routed to stakers when the market
//! trades above the policy ceiling.
//!
//! - Below peg: callers burn cash for bonds at a discount, bounded by a
//!   per-epoch conversion budget
//! - Above ceiling: bonds redeem 1:1 against the treasury's cash, and the
//!   once-per-epoch allocation mints seigniorage for the boardroom
//!
//! # Key Properties
//!
//! - Price reads are fail-closed; cache refreshes are fail-open
//! - One guarded call per caller per block
//! - Migration is irreversible and disables every operation

pub mod calculator;
pub mod collaborators;
pub mod constants;
pub mod engine;
pub mod events;
pub mod guards;
pub mod memory;
pub mod oracle;
pub mod state;

pub use calculator::*;
pub use collaborators::*;
pub use constants::*;
pub use engine::*;
pub use events::*;
pub use guards::*;
pub use oracle::*;
pub use state::*;
