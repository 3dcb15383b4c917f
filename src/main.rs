use betledger::api::router::create_router;
use betledger::config::{init_tracing, AppConfig};
use betledger::{db, metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format, "info");

    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!(database_url = %config.database_url, "Opening ledger...");
    let db = db::init_pool(&config.database_url).await?;
    tracing::info!("Ledger ready");

    let metrics_handle = metrics::init_metrics()?;

    if config.api_token.is_none() {
        tracing::warn!("API_TOKEN is not set, ledger API is unauthenticated");
    }

    let state = AppState {
        db,
        config,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}
