//! Core type definitions for Bulwark

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::IdError;

/// Ledger account identity (32 bytes, hex-encoded)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse and validate a caller-supplied identity.
    ///
    /// Identities are 32-byte values in lowercase hex, the format the
    /// ledger uses for accounts. `new` skips validation for identities
    /// that originate inside the process.
    pub fn parse(id: &str) -> Result<Self, IdError> {
        validate_id_hex(id)?;
        Ok(Self(id.to_string()))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Managed asset identity (32 bytes, hex-encoded)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn parse(id: &str) -> Result<Self, IdError> {
        validate_id_hex(id)?;
        Ok(Self(id.to_string()))
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_id_hex(id: &str) -> Result<(), IdError> {
    let bytes = hex::decode(id).map_err(|e| IdError::NotHex {
        reason: e.to_string(),
    })?;

    if bytes.len() != 32 {
        return Err(IdError::WrongLength { len: bytes.len() });
    }

    if id.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(IdError::NotHex {
            reason: "uppercase hex digits are not canonical".to_string(),
        });
    }

    Ok(())
}

/// Ledger block height
pub type BlockHeight = u64;

/// Unix timestamp in seconds
pub type Timestamp = u64;

/// Token amount in base units (1 cash = 1_000_000_000 base units)
pub type Amount = u128;

/// Ledger-environment values stamped onto every submitted operation.
///
/// The ledger executes operations strictly serialized; each call sees the
/// caller identity and the block it executes in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallContext {
    /// Identity the operation executes as
    pub caller: AccountId,
    /// Block the operation executes in
    pub height: BlockHeight,
    /// Block timestamp
    pub timestamp: Timestamp,
}

impl CallContext {
    pub fn new(caller: AccountId, height: BlockHeight, timestamp: Timestamp) -> Self {
        Self {
            caller,
            height,
            timestamp,
        }
    }
}

/// Constants
pub mod constants {
    use super::Amount;

    /// Base units per whole token (9 decimal places)
    pub const UNIT: Amount = 1_000_000_000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_parse() {
        let id = "a7".repeat(32);
        assert!(AccountId::parse(&id).is_ok());

        // Too short
        assert!(AccountId::parse("a7a7").is_err());

        // Not hex
        assert!(AccountId::parse(&"zz".repeat(32)).is_err());

        // Uppercase is rejected as non-canonical
        assert!(AccountId::parse(&"A7".repeat(32)).is_err());
    }

    #[test]
    fn test_asset_id_display() {
        let id = AssetId::new("cash");
        assert_eq!(id.to_string(), "cash");
        assert_eq!(id.as_str(), "cash");
    }

    #[test]
    fn test_account_id_serde_transparent() {
        let id = AccountId::new("ab".repeat(32));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));
    }
}
