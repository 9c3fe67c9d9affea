//! Data Transfer Objects for API requests and responses
//!
//! Amounts in responses are decimal strings: base-unit values do not fit
//! the number range every JSON consumer supports.

use serde::{Deserialize, Serialize};

use bulwark_core::{Amount, Fixed};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }
}

/// Chain clock advance request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceChainRequest {
    /// Blocks to advance (default 1)
    #[serde(default = "default_blocks")]
    pub blocks: u64,
}

fn default_blocks() -> u64 {
    1
}

/// Reserve snapshot request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeRequest {
    pub caller: String,
}

/// Reserve snapshot response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResponse {
    pub reserve: String,
}

/// Migration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrateRequest {
    pub caller: String,
    pub target: String,
}

/// Bond purchase request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyBondsRequest {
    pub caller: String,
    /// Cash to convert, in base units
    pub amount: Amount,
    /// Highest acceptable cash price, at 10^18 scale
    pub target_price: Fixed,
}

/// Bond purchase response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyBondsResponse {
    pub cash_burned: String,
    pub bonds_minted: String,
}

/// Bond purchase preview request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewBondsRequest {
    /// Cash to convert, in base units
    pub amount: Amount,
    /// Highest acceptable cash price, at 10^18 scale
    pub target_price: Fixed,
}

/// Bond purchase preview response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewBondsResponse {
    pub cash_burned: String,
    pub bonds_minted: String,
    pub can_execute: bool,
    pub error: Option<String>,
}

/// Bond redemption request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemBondsRequest {
    pub caller: String,
    /// Bonds to redeem, in base units
    pub amount: Amount,
}

/// Bond redemption response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemBondsResponse {
    pub bonds_burned: String,
    pub cash_paid: String,
}

/// Seigniorage allocation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateRequest {
    pub caller: String,
}

/// Seigniorage allocation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateResponse {
    /// Cash minted and forwarded to the boardroom (zero on a quiet market)
    pub seigniorage: String,
    /// Epoch index after the allocation consumed it
    pub epoch: u64,
}
