use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::db::bet_repo;
use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match bet_repo::count_rows(&state.db, None).await {
        Ok(bets) => (StatusCode::OK, Json(json!({ "status": "healthy", "bets": bets }))),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "db": "unavailable" })),
            )
        }
    }
}
