//! Configuration types for Bulwark

use serde::{Deserialize, Serialize};

use crate::fixed::Fixed;
use crate::types::{Amount, Timestamp};

/// Monetary-policy timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Unix time before which every mutating operation fails
    pub start_time: Timestamp,

    /// Policy epoch length in seconds (one allocation per epoch)
    #[serde(default = "default_epoch_period")]
    pub epoch_period_secs: u64,
}

fn default_epoch_period() -> u64 {
    86_400
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            start_time: 0,
            epoch_period_secs: default_epoch_period(),
        }
    }
}

/// Seed values for a simulated deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Cash held by the treasury at deployment, in base units.
    /// Snapshotted into the redemption reserve by `initialize`.
    pub treasury_cash: Amount,

    /// Cash in public circulation at deployment, in base units
    pub circulating_cash: Amount,

    /// Initial price reported by both oracles
    pub cash_price: Fixed,

    /// Ceiling reported by the constant reference curve
    pub ceiling_price: Fixed,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            treasury_cash: 0,
            circulating_cash: 1_000_000 * crate::types::constants::UNIT,
            cash_price: Fixed::ONE,
            ceiling_price: Fixed(1_050_000_000_000_000_000),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Policy timing
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Simulated deployment seed
    #[serde(default)]
    pub genesis: GenesisConfig,
}

fn default_api_port() -> u16 {
    19418
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            policy: PolicyConfig::default(),
            genesis: GenesisConfig::default(),
        }
    }
}
