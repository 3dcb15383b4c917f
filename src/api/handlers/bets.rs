use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ApiResponse;
use crate::db::bet_repo;
use crate::errors::AppError;
use crate::models::{Bet, BetPatch, BetResult, NewBet, LEAGUES, MARKETS};
use crate::settlement::{self, Settlement, Wager};
use crate::AppState;

/// GET /api/bets: every bet in entry order with derived fields.
pub async fn list(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Bet>>>, AppError> {
    let bets = bet_repo::list_rows(&state.db).await?;
    Ok(Json(ApiResponse::ok(bets)))
}

/// POST /api/bets: log a new bet.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewBet>,
) -> Result<(StatusCode, Json<ApiResponse<Bet>>), AppError> {
    let bet = bet_repo::append_row(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(bet))))
}

/// GET /api/bets/:id
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Bet>>, AppError> {
    let bet = bet_repo::get_row(&state.db, id).await?;
    Ok(Json(ApiResponse::ok(bet)))
}

/// PATCH /api/bets/:id: edit or settle a bet.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<BetPatch>,
) -> Result<Json<ApiResponse<Bet>>, AppError> {
    if patch.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }
    let bet = bet_repo::update_row(&state.db, id, patch).await?;
    Ok(Json(ApiResponse::ok(bet)))
}

#[derive(Serialize)]
pub struct Deleted {
    pub deleted: u64,
}

/// DELETE /api/bets/:id
pub async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Deleted>>, AppError> {
    let deleted = bet_repo::delete_rows(&state.db, &[id]).await?;
    Ok(Json(ApiResponse::ok(Deleted { deleted })))
}

#[derive(Deserialize)]
pub struct DeleteRequest {
    pub ids: Vec<i64>,
}

/// POST /api/bets/delete: remove several bets at once.
pub async fn delete_many(
    State(state): State<AppState>,
    Json(body): Json<DeleteRequest>,
) -> Result<Json<ApiResponse<Deleted>>, AppError> {
    let deleted = bet_repo::delete_rows(&state.db, &body.ids).await?;
    Ok(Json(ApiResponse::ok(Deleted { deleted })))
}

#[derive(Serialize)]
pub struct FormOptions {
    pub leagues: &'static [&'static str],
    pub markets: &'static [&'static str],
    pub results: Vec<BetResult>,
}

/// GET /api/bets/options: choices for the logging form.
pub async fn options() -> Json<ApiResponse<FormOptions>> {
    Json(ApiResponse::ok(FormOptions {
        leagues: LEAGUES,
        markets: MARKETS,
        results: BetResult::ALL.to_vec(),
    }))
}

#[derive(Deserialize)]
pub struct PreviewRequest {
    pub stake: Decimal,
    pub american_odds: i32,
    #[serde(default)]
    pub result: BetResult,
    #[serde(default)]
    pub bonus: bool,
    #[serde(default)]
    pub profit_boost: Decimal,
}

/// POST /api/settle/preview: settle without storing, for the form preview.
pub async fn preview(Json(body): Json<PreviewRequest>) -> Result<Json<ApiResponse<Settlement>>, AppError> {
    let settlement = settlement::settle(&Wager {
        stake: body.stake,
        american_odds: body.american_odds,
        result: body.result,
        bonus: body.bonus,
        profit_boost: body.profit_boost,
    })?;
    Ok(Json(ApiResponse::ok(settlement)))
}
