//! Treasury protocol endpoints

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use bulwark_core::{AccountId, TreasuryError};
use treasury::{EventRecord, TreasuryStatus};

use crate::dto::{
    AllocateRequest, AllocateResponse, ApiError, BuyBondsRequest, BuyBondsResponse,
    InitializeRequest, InitializeResponse, MigrateRequest, PreviewBondsRequest,
    PreviewBondsResponse, RedeemBondsRequest, RedeemBondsResponse,
};
use crate::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

/// Create treasury routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(get_status))
        .route("/events", get(get_events))
        .route("/initialize", post(initialize))
        .route("/migrate", post(migrate))
        .route("/bonds/buy", post(buy_bonds))
        .route("/bonds/preview", post(preview_bonds))
        .route("/bonds/redeem", post(redeem_bonds))
        .route("/allocate", post(allocate_seigniorage))
}

fn map_treasury_error(e: TreasuryError) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(ApiError::new(e.error_code(), e.to_string())),
    )
}

fn parse_account(id: &str) -> Result<AccountId, (StatusCode, Json<ApiError>)> {
    AccountId::parse(id).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::bad_request(format!("invalid account id: {}", e))),
        )
    })
}

/// GET /treasury/status - Aggregate policy state
pub async fn get_status(State(state): State<AppState>) -> ApiResult<TreasuryStatus> {
    state
        .with_treasury(|t| t.status())
        .await
        .map(Json)
        .map_err(map_treasury_error)
}

/// GET /treasury/events - Audit event log
pub async fn get_events(State(state): State<AppState>) -> Json<Vec<EventRecord>> {
    Json(state.with_treasury(|t| t.events().to_vec()).await)
}

/// POST /treasury/initialize - One-time reserve snapshot
pub async fn initialize(
    State(state): State<AppState>,
    Json(request): Json<InitializeRequest>,
) -> ApiResult<InitializeResponse> {
    let caller = parse_account(&request.caller)?;
    let ctx = state.context_for(caller).await;

    let reserve = state
        .with_treasury_mut(|t| t.initialize(&ctx))
        .await
        .map_err(map_treasury_error)?;

    Ok(Json(InitializeResponse {
        reserve: reserve.to_string(),
    }))
}

/// POST /treasury/migrate - Irreversible handover to a successor
pub async fn migrate(
    State(state): State<AppState>,
    Json(request): Json<MigrateRequest>,
) -> ApiResult<serde_json::Value> {
    let caller = parse_account(&request.caller)?;
    let target = parse_account(&request.target)?;
    let ctx = state.context_for(caller).await;

    state
        .with_treasury_mut(|t| t.migrate(&ctx, &target))
        .await
        .map_err(map_treasury_error)?;

    Ok(Json(serde_json::json!({ "migrated": true })))
}

/// POST /treasury/bonds/buy - Exchange cash for discounted bonds
pub async fn buy_bonds(
    State(state): State<AppState>,
    Json(request): Json<BuyBondsRequest>,
) -> ApiResult<BuyBondsResponse> {
    let caller = parse_account(&request.caller)?;
    let ctx = state.context_for(caller).await;

    let purchase = state
        .with_treasury_mut(|t| t.buy_bonds(&ctx, request.amount, request.target_price))
        .await
        .map_err(map_treasury_error)?;

    Ok(Json(BuyBondsResponse {
        cash_burned: purchase.cash_burned.to_string(),
        bonds_minted: purchase.bonds_minted.to_string(),
    }))
}

/// POST /treasury/bonds/preview - Preview a purchase without executing
pub async fn preview_bonds(
    State(state): State<AppState>,
    Json(request): Json<PreviewBondsRequest>,
) -> ApiResult<PreviewBondsResponse> {
    let chain = state.chain().await;

    let preview = state
        .with_treasury(|t| t.preview_buy_bonds(request.amount, request.target_price, chain.timestamp))
        .await;

    // Policy rejections are part of the preview, not transport errors
    Ok(Json(match preview {
        Ok(p) => PreviewBondsResponse {
            cash_burned: p.cash_burned.to_string(),
            bonds_minted: p.bonds_minted.to_string(),
            can_execute: p.cash_burned > 0,
            error: None,
        },
        Err(e) => PreviewBondsResponse {
            cash_burned: "0".to_string(),
            bonds_minted: "0".to_string(),
            can_execute: false,
            error: Some(e.to_string()),
        },
    }))
}

/// POST /treasury/bonds/redeem - Redeem bonds for cash 1:1
pub async fn redeem_bonds(
    State(state): State<AppState>,
    Json(request): Json<RedeemBondsRequest>,
) -> ApiResult<RedeemBondsResponse> {
    let caller = parse_account(&request.caller)?;
    let ctx = state.context_for(caller).await;

    state
        .with_treasury_mut(|t| t.redeem_bonds(&ctx, request.amount))
        .await
        .map_err(map_treasury_error)?;

    Ok(Json(RedeemBondsResponse {
        bonds_burned: request.amount.to_string(),
        cash_paid: request.amount.to_string(),
    }))
}

/// POST /treasury/allocate - Epoch-gated seigniorage allocation
pub async fn allocate_seigniorage(
    State(state): State<AppState>,
    Json(request): Json<AllocateRequest>,
) -> ApiResult<AllocateResponse> {
    let caller = parse_account(&request.caller)?;
    let ctx = state.context_for(caller).await;

    let (seigniorage, epoch) = state
        .with_treasury_mut(|t| {
            let seigniorage = t.allocate_seigniorage(&ctx)?;
            Ok::<_, TreasuryError>((seigniorage, t.epoch()))
        })
        .await
        .map_err(map_treasury_error)?;

    Ok(Json(AllocateResponse {
        seigniorage: seigniorage.to_string(),
        epoch,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use bulwark_core::constants::UNIT;
    use bulwark_core::{AssetId, Fixed};
    use treasury::memory::{FixedCeilingCurve, MemoryAsset, MemoryBoardroom, MemoryOracle};
    use treasury::{Asset, Treasury, TreasuryParams};

    use crate::state::SimChain;

    const START: u64 = 1_700_000_000;

    fn account(tag: &str) -> AccountId {
        let mut bytes = [0u8; 32];
        bytes[..tag.len()].copy_from_slice(tag.as_bytes());
        AccountId::new(hex::encode(bytes))
    }

    fn test_state(bond_price: Fixed) -> (AppState, Arc<MemoryAsset>) {
        let treasury_account = account("treasury");
        let cash_id = AssetId::new("ca".repeat(32));
        let cash = Arc::new(MemoryAsset::new(cash_id.clone(), treasury_account.clone()));
        let bond = Arc::new(MemoryAsset::new(
            AssetId::new("b0".repeat(32)),
            treasury_account.clone(),
        ));
        let share = Arc::new(MemoryAsset::new(
            AssetId::new("5a".repeat(32)),
            treasury_account.clone(),
        ));
        cash.mint(&account("alice"), 1_000_000 * UNIT).unwrap();

        let treasury = Treasury::new(TreasuryParams {
            account: treasury_account.clone(),
            operator: account("operator"),
            cash: cash.clone(),
            bond,
            share,
            bond_oracle: Arc::new(MemoryOracle::new(
                "bond oracle",
                cash_id.clone(),
                bond_price,
                START,
                3_600,
            )),
            seigniorage_oracle: Arc::new(MemoryOracle::new(
                "seigniorage oracle",
                cash_id,
                bond_price,
                START,
                3_600,
            )),
            curve: Arc::new(FixedCeilingCurve::new(
                Fixed::from_ratio(105, 100).unwrap(),
            )),
            boardroom: Arc::new(MemoryBoardroom::new(
                "boardroom",
                account("boardroom"),
                treasury_account,
            )),
            start_time: START,
            epoch_period: 86_400,
        });

        (
            AppState::new(treasury, SimChain::new(1, START + 3_600, 5)),
            cash,
        )
    }

    #[tokio::test]
    async fn test_get_status_handler() {
        let (state, _) = test_state(Fixed::from_ratio(8, 10).unwrap());

        let status = get_status(State(state)).await.unwrap().0;
        assert_eq!(status.circulating_supply, 1_000_000 * UNIT);
        assert!(status.can_buy_bonds);
    }

    #[tokio::test]
    async fn test_buy_bonds_handler_clamps_and_reports() {
        let (state, cash) = test_state(Fixed::from_ratio(8, 10).unwrap());

        let response = buy_bonds(
            State(state),
            Json(BuyBondsRequest {
                caller: account("alice").to_string(),
                amount: 300_000 * UNIT,
                target_price: Fixed::from_ratio(8, 10).unwrap(),
            }),
        )
        .await
        .unwrap()
        .0;

        assert_eq!(response.cash_burned, (200_000 * UNIT).to_string());
        assert_eq!(response.bonds_minted, (250_000 * UNIT).to_string());
        assert_eq!(cash.balance_of(&account("alice")), 800_000 * UNIT);
    }

    #[tokio::test]
    async fn test_buy_bonds_handler_maps_policy_errors() {
        let (state, _) = test_state(Fixed::ONE);

        let err = buy_bonds(
            State(state),
            Json(BuyBondsRequest {
                caller: account("alice").to_string(),
                amount: UNIT,
                target_price: Fixed::ONE,
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.1 .0.code, "price_ineligible");
    }

    #[tokio::test]
    async fn test_invalid_caller_is_bad_request() {
        let (state, _) = test_state(Fixed::ONE);

        let err = initialize(
            State(state),
            Json(InitializeRequest {
                caller: "not-an-account".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_preview_reports_rejection_without_failing() {
        let (state, _) = test_state(Fixed::ONE);

        let preview = preview_bonds(
            State(state),
            Json(PreviewBondsRequest {
                amount: UNIT,
                target_price: Fixed::ONE,
            }),
        )
        .await
        .unwrap()
        .0;

        assert!(!preview.can_execute);
        assert!(preview.error.is_some());
    }
}
