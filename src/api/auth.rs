use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::AppState;

/// Bearer-token authentication middleware.
///
/// When `API_TOKEN` is configured, every request must carry
/// `Authorization: Bearer <token>` matching it. Without a token the ledger
/// is open, which is the normal single-user local setup.
pub async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(expected) = state.config.api_token.as_deref() else {
        return next.run(req).await;
    };

    let authorized = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token == expected);

    if authorized {
        next.run(req).await
    } else {
        tracing::warn!(path = %req.uri().path(), "Rejected request without valid token");
        AppError::Unauthorized.into_response()
    }
}
