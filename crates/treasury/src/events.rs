//! Audit Event Log
//!
//! Append-only, timestamped records of every committed state transition,
//! queryable by observers.

use serde::{Deserialize, Serialize};

use bulwark_core::{AccountId, Amount, Timestamp};

/// A committed treasury state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreasuryEvent {
    /// One-time reserve snapshot
    Initialized { reserve: Amount },

    /// Irreversible handover to a successor
    Migration { target: AccountId },

    BondOracleChanged { old: String, new: String },

    SeigniorageOracleChanged { old: String, new: String },

    CeilingCurveChanged { old: String, new: String },

    BoughtBonds {
        caller: AccountId,
        cash_burned: Amount,
        bonds_minted: Amount,
    },

    RedeemedBonds {
        caller: AccountId,
        bonds_burned: Amount,
        cash_paid: Amount,
    },

    BoardroomFunded { seigniorage: Amount },
}

/// An event with the block timestamp it was committed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub event: TreasuryEvent,
}

impl EventRecord {
    pub fn new(timestamp: Timestamp, event: TreasuryEvent) -> Self {
        Self { timestamp, event }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let record = EventRecord::new(
            1_700_000_000,
            TreasuryEvent::BoughtBonds {
                caller: AccountId::new("a1".repeat(32)),
                cash_burned: 200_000,
                bonds_minted: 250_000,
            },
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "bought_bonds");
        assert_eq!(json["timestamp"], 1_700_000_000u64);
        assert_eq!(json["cash_burned"], 200_000);

        let parsed: EventRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_change_record_carries_old_and_new() {
        let record = EventRecord::new(
            1,
            TreasuryEvent::BondOracleChanged {
                old: "oracle a".to_string(),
                new: "oracle b".to_string(),
            },
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["old"], "oracle a");
        assert_eq!(json["new"], "oracle b");
    }
}
