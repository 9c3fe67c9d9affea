//! Application state shared across API handlers

use std::sync::Arc;

use tokio::sync::RwLock;

use bulwark_core::{AccountId, BlockHeight, CallContext, Timestamp};
use treasury::Treasury;

/// The simulated ledger clock.
///
/// The ledger executes operations strictly serialized; the API stamps each
/// submitted operation with the current height and timestamp. Height moves
/// only through the explicit advance route, so same-block behavior (the
/// per-caller block guard) is observable over HTTP.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SimChain {
    pub height: BlockHeight,
    pub timestamp: Timestamp,
    /// Seconds added per block on advance
    pub block_time: u64,
}

impl SimChain {
    pub fn new(height: BlockHeight, timestamp: Timestamp, block_time: u64) -> Self {
        Self {
            height,
            timestamp,
            block_time,
        }
    }

    pub fn advance(&mut self, blocks: u64) {
        self.height += blocks;
        self.timestamp += blocks * self.block_time;
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    treasury: RwLock<Treasury>,
    chain: RwLock<SimChain>,
}

impl AppState {
    pub fn new(treasury: Treasury, chain: SimChain) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                treasury: RwLock::new(treasury),
                chain: RwLock::new(chain),
            }),
        }
    }

    /// Run a read-only closure against the treasury.
    pub async fn with_treasury<R>(&self, f: impl FnOnce(&Treasury) -> R) -> R {
        let treasury = self.inner.treasury.read().await;
        f(&treasury)
    }

    /// Run a mutating closure against the treasury.
    pub async fn with_treasury_mut<R>(&self, f: impl FnOnce(&mut Treasury) -> R) -> R {
        let mut treasury = self.inner.treasury.write().await;
        f(&mut treasury)
    }

    /// Current chain clock
    pub async fn chain(&self) -> SimChain {
        self.inner.chain.read().await.clone()
    }

    /// Advance the chain clock by `blocks`
    pub async fn advance_chain(&self, blocks: u64) -> SimChain {
        let mut chain = self.inner.chain.write().await;
        chain.advance(blocks);
        tracing::info!(height = chain.height, "chain advanced");
        chain.clone()
    }

    /// Build the call context an operation submitted now executes under.
    pub async fn context_for(&self, caller: AccountId) -> CallContext {
        let chain = self.inner.chain.read().await;
        CallContext::new(caller, chain.height, chain.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_chain_advance() {
        let mut chain = SimChain::new(100, 1_000, 5);
        chain.advance(3);
        assert_eq!(chain.height, 103);
        assert_eq!(chain.timestamp, 1_015);
    }
}
