//! Simulated chain clock endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::dto::AdvanceChainRequest;
use crate::state::SimChain;
use crate::AppState;

/// Create chain routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_chain))
        .route("/advance", post(advance))
}

/// GET /chain - Current height and timestamp
pub async fn get_chain(State(state): State<AppState>) -> Json<SimChain> {
    Json(state.chain().await)
}

/// POST /chain/advance - Move the clock forward
pub async fn advance(
    State(state): State<AppState>,
    Json(request): Json<AdvanceChainRequest>,
) -> Json<SimChain> {
    Json(state.advance_chain(request.blocks).await)
}
