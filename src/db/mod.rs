pub mod bet_repo;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

/// How long a writer waits for the database lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// Open the ledger database, creating the file and schema when missing.
pub async fn init_pool(database_url: &str) -> anyhow::Result<SqlitePool> {
    if let Some(db_path) = database_url.strip_prefix("sqlite://") {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    // Every in-memory connection is its own database, so keep exactly one.
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    // Verify connectivity
    sqlx::query("SELECT 1").execute(&pool).await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            placed_on TEXT NOT NULL,
            sportsbook TEXT NOT NULL,
            league TEXT NOT NULL DEFAULT '',
            market TEXT NOT NULL DEFAULT '',
            pick TEXT NOT NULL,
            stake TEXT NOT NULL,
            american_odds INTEGER NOT NULL CHECK(american_odds <> 0),
            result TEXT NOT NULL CHECK(result IN ('Open', 'Win', 'Loss', 'Push')),
            bonus BOOLEAN NOT NULL DEFAULT 0,
            profit_boost TEXT NOT NULL DEFAULT '0',
            decimal_odds TEXT NOT NULL,
            payout TEXT,
            net_pnl TEXT,
            cumulative_pnl TEXT NOT NULL DEFAULT '0',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_bets_sportsbook ON bets (sportsbook)")
        .execute(pool)
        .await?;

    Ok(())
}
