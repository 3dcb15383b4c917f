use axum::extract::State;
use axum::Json;

use super::ApiResponse;
use crate::db::bet_repo;
use crate::errors::AppError;
use crate::reporting::{cumulative_series, pnl_by_sportsbook, PnlPoint, SportsbookPnl};
use crate::AppState;

/// GET /api/analytics/pnl-history: cumulative net PnL line, one point per bet.
pub async fn pnl_history(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PnlPoint>>>, AppError> {
    let bets = bet_repo::list_rows(&state.db).await?;
    Ok(Json(ApiResponse::ok(cumulative_series(&bets))))
}

/// GET /api/analytics/by-sportsbook: net PnL bars per sportsbook.
pub async fn by_sportsbook(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SportsbookPnl>>>, AppError> {
    let bets = bet_repo::list_rows(&state.db).await?;
    Ok(Json(ApiResponse::ok(pnl_by_sportsbook(&bets))))
}
