//! Treasury Protocol Constants

use bulwark_core::{Fixed, SCALE};

/// Protocol parameters
pub mod params {
    use super::*;

    /// Target price the cash asset tracks (1.0 at 10^18 scale)
    pub const CASH_PEG: Fixed = Fixed(SCALE);

    /// Policy epoch length: one seigniorage allocation per day
    pub const EPOCH_PERIOD_SECS: u64 = 86_400;

    /// Heights retained by the per-block call guard before pruning
    pub const GUARD_RETENTION_BLOCKS: u64 = 64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_params() {
        assert_eq!(params::CASH_PEG, Fixed::ONE);
        assert_eq!(params::EPOCH_PERIOD_SECS, 86_400);
    }
}
