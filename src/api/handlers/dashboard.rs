use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::ApiResponse;
use crate::db::bet_repo;
use crate::errors::AppError;
use crate::reporting::{as_percent, calculate_kpis};
use crate::AppState;

/// Display-ready KPIs. Amounts are rounded to cents, rates are percentages.
#[derive(Serialize)]
pub struct DashboardSummary {
    pub total_bets: usize,
    pub settled_bets: usize,
    pub pending_bets: usize,
    pub wins: usize,
    pub losses: usize,
    pub pushes: usize,
    pub bonus_bets: usize,
    pub total_pnl: String,
    pub total_stake: String,
    pub win_pct: String,
    pub roi_pct: String,
    pub max_drawdown: String,
}

pub async fn summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardSummary>>, AppError> {
    let bets = bet_repo::list_rows(&state.db).await?;
    let k = calculate_kpis(&bets);

    Ok(Json(ApiResponse::ok(DashboardSummary {
        total_bets: k.total_bets,
        settled_bets: k.settled_bets,
        pending_bets: k.pending_bets,
        wins: k.wins,
        losses: k.losses,
        pushes: k.pushes,
        bonus_bets: k.bonus_bets,
        total_pnl: k.total_pnl.round_dp(2).to_string(),
        total_stake: k.total_stake.round_dp(2).to_string(),
        win_pct: as_percent(k.win_rate).to_string(),
        roi_pct: as_percent(k.roi).to_string(),
        max_drawdown: k.max_drawdown.round_dp(2).to_string(),
    })))
}
