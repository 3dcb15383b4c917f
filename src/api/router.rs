use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::auth::require_auth;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    // Public routes: no authentication required
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Ledger API: requires Bearer token when API_TOKEN is set
    let protected = Router::new()
        // Bets
        .route("/api/bets", get(handlers::bets::list).post(handlers::bets::create))
        .route("/api/bets/options", get(handlers::bets::options))
        .route("/api/bets/delete", post(handlers::bets::delete_many))
        .route(
            "/api/bets/:id",
            get(handlers::bets::detail)
                .patch(handlers::bets::update)
                .delete(handlers::bets::delete_one),
        )
        .route("/api/settle/preview", post(handlers::bets::preview))
        // Dashboard
        .route("/api/dashboard/summary", get(handlers::dashboard::summary))
        // Analytics
        .route("/api/analytics/pnl-history", get(handlers::analytics::pnl_history))
        .route("/api/analytics/by-sportsbook", get(handlers::analytics::by_sportsbook))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // The form front end may be served from another origin during development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
