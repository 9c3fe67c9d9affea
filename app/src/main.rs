//! Bulwark treasury server
//!
//! Wires a simulated deployment from the in-memory reference collaborators
//! and serves the treasury API: a cash/bond/share asset triple, two price
//! oracles, a constant ceiling curve, and a recording boardroom, seeded
//! from the genesis section of the configuration file.

use std::fs;
use std::sync::Arc;

use anyhow::Context;

use bulwark_api::{start_server, AppState, SimChain};
use bulwark_core::{AccountId, AppConfig, AssetId};
use treasury::memory::{FixedCeilingCurve, MemoryAsset, MemoryBoardroom, MemoryOracle};
use treasury::{Asset, Treasury, TreasuryParams};

/// Oracle refresh period for the simulated price sources
const ORACLE_PERIOD_SECS: u64 = 3_600;

/// Seconds per simulated block
const BLOCK_TIME_SECS: u64 = 5;

/// Deterministic 32-byte identity for a well-known deployment role
fn demo_account(tag: &str) -> AccountId {
    let mut bytes = [0u8; 32];
    bytes[..tag.len()].copy_from_slice(tag.as_bytes());
    AccountId::new(hex::encode(bytes))
}

fn demo_asset(tag: &str) -> AssetId {
    let mut bytes = [0u8; 32];
    bytes[..tag.len()].copy_from_slice(tag.as_bytes());
    AssetId::new(hex::encode(bytes))
}

fn load_config() -> anyhow::Result<AppConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {}", path))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse config file {}", path))
        }
        None => Ok(AppConfig::default()),
    }
}

fn build_treasury(config: &AppConfig) -> anyhow::Result<Treasury> {
    let treasury_account = demo_account("bulwark-treasury");
    let operator = demo_account("bulwark-operator");
    let market = demo_account("market");

    let cash_id = demo_asset("bulwark-cash");
    let cash = Arc::new(MemoryAsset::new(cash_id.clone(), treasury_account.clone()));
    let bond = Arc::new(MemoryAsset::new(
        demo_asset("bulwark-bond"),
        treasury_account.clone(),
    ));
    let share = Arc::new(MemoryAsset::new(
        demo_asset("bulwark-share"),
        treasury_account.clone(),
    ));

    cash.mint(&market, config.genesis.circulating_cash)
        .context("failed to seed circulating cash")?;
    cash.mint(&treasury_account, config.genesis.treasury_cash)
        .context("failed to seed treasury cash")?;

    let bond_oracle = Arc::new(MemoryOracle::new(
        "bond oracle",
        cash_id.clone(),
        config.genesis.cash_price,
        config.policy.start_time,
        ORACLE_PERIOD_SECS,
    ));
    let seigniorage_oracle = Arc::new(MemoryOracle::new(
        "seigniorage oracle",
        cash_id,
        config.genesis.cash_price,
        config.policy.start_time,
        ORACLE_PERIOD_SECS,
    ));

    let boardroom = Arc::new(MemoryBoardroom::new(
        "boardroom",
        demo_account("bulwark-boardroom"),
        treasury_account.clone(),
    ));

    Ok(Treasury::new(TreasuryParams {
        account: treasury_account,
        operator,
        cash,
        bond,
        share,
        bond_oracle,
        seigniorage_oracle,
        curve: Arc::new(FixedCeilingCurve::new(config.genesis.ceiling_price)),
        boardroom,
        start_time: config.policy.start_time,
        epoch_period: config.policy.epoch_period_secs,
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?;
    let treasury = build_treasury(&config)?;

    tracing::info!(
        operator = %demo_account("bulwark-operator"),
        start_time = config.policy.start_time,
        epoch_period = config.policy.epoch_period_secs,
        "simulated deployment ready"
    );

    let chain = SimChain::new(1, config.policy.start_time, BLOCK_TIME_SECS);
    let state = AppState::new(treasury, chain);

    start_server(state, config.api_port)
        .await
        .context("API server failed")?;

    Ok(())
}
