use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{SqliteConnection, SqlitePool};

use crate::errors::LedgerError;
use crate::models::bet::parse_amount;
use crate::models::{Bet, BetPatch, BetResult, BetRow, NewBet};
use crate::settlement::{self, recompute_cumulative_from, Settlement};

/// Writers take the lock up front and wait on the busy timeout.
const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

/// Canonical text form used for every stored amount.
fn amount(d: Decimal) -> String {
    d.normalize().to_string()
}

/// Validate and settle a bet's terms before anything touches the store.
fn prepare(mut bet: NewBet) -> Result<(NewBet, Settlement), LedgerError> {
    bet.normalize()?;
    let settlement = settlement::settle(&bet.wager())?;
    Ok((bet, settlement))
}

/// Append a new bet. Settlement and its cumulative PnL are computed and
/// written in the same transaction as the insert.
pub async fn append_row(pool: &SqlitePool, new_bet: NewBet) -> Result<Bet, LedgerError> {
    let (bet, s) = prepare(new_bet)?;
    let now = Utc::now();

    let mut tx = pool.begin_with(BEGIN_WRITE).await?;

    let row = sqlx::query_as::<_, BetRow>(
        r#"
        INSERT INTO bets (
            placed_on, sportsbook, league, market, pick, stake, american_odds,
            result, bonus, profit_boost, decimal_odds, payout, net_pnl,
            cumulative_pnl, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, '0', ?14, ?14)
        RETURNING *
        "#,
    )
    .bind(bet.placed_on)
    .bind(&bet.sportsbook)
    .bind(&bet.league)
    .bind(&bet.market)
    .bind(&bet.pick)
    .bind(amount(bet.stake))
    .bind(bet.american_odds)
    .bind(bet.result.as_str())
    .bind(bet.bonus)
    .bind(amount(bet.profit_boost))
    .bind(amount(s.decimal_odds))
    .bind(s.payout.map(amount))
    .bind(s.net_pnl.map(amount))
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    recompute_from(&mut *tx, row.id).await?;
    let logged = fetch(&mut *tx, row.id).await?;
    tx.commit().await?;

    metrics::counter!("bets_logged_total").increment(1);
    refresh_gauges(pool).await;

    tracing::info!(
        id = logged.id,
        sportsbook = %logged.sportsbook,
        pick = %logged.pick,
        stake = %logged.stake,
        odds = logged.american_odds,
        result = %logged.result,
        bonus = logged.bonus,
        "Bet logged"
    );

    Ok(logged)
}

/// Apply a partial edit, re-settle the row and recompute the cumulative PnL
/// of it and every later row.
pub async fn update_row(pool: &SqlitePool, id: i64, patch: BetPatch) -> Result<Bet, LedgerError> {
    let mut tx = pool.begin_with(BEGIN_WRITE).await?;

    let current = fetch(&mut *tx, id).await?;
    let previous_result = current.result;
    let (bet, s) = prepare(patch.apply(&current))?;

    sqlx::query(
        r#"
        UPDATE bets
        SET placed_on = ?2, sportsbook = ?3, league = ?4, market = ?5, pick = ?6,
            stake = ?7, american_odds = ?8, result = ?9, bonus = ?10, profit_boost = ?11,
            decimal_odds = ?12, payout = ?13, net_pnl = ?14, updated_at = ?15
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .bind(bet.placed_on)
    .bind(&bet.sportsbook)
    .bind(&bet.league)
    .bind(&bet.market)
    .bind(&bet.pick)
    .bind(amount(bet.stake))
    .bind(bet.american_odds)
    .bind(bet.result.as_str())
    .bind(bet.bonus)
    .bind(amount(bet.profit_boost))
    .bind(amount(s.decimal_odds))
    .bind(s.payout.map(amount))
    .bind(s.net_pnl.map(amount))
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    let touched = recompute_from(&mut *tx, id).await?;
    let updated = fetch(&mut *tx, id).await?;
    tx.commit().await?;

    metrics::counter!("bets_updated_total").increment(1);
    refresh_gauges(pool).await;

    if previous_result.is_settled() && updated.result != previous_result {
        tracing::warn!(
            id,
            from = %previous_result,
            to = %updated.result,
            "Settled result revised"
        );
    }
    tracing::info!(
        id,
        result = %updated.result,
        net_pnl = ?updated.net_pnl,
        cumulative_rows_rewritten = touched,
        "Bet updated"
    );

    Ok(updated)
}

/// Delete the given bets and recompute cumulative PnL over what remains.
/// Either every id exists and all are removed, or nothing changes.
pub async fn delete_rows(pool: &SqlitePool, ids: &[i64]) -> Result<u64, LedgerError> {
    let unique: BTreeSet<i64> = ids.iter().copied().collect();
    if unique.is_empty() {
        return Err(LedgerError::EmptySelection);
    }

    let mut tx = pool.begin_with(BEGIN_WRITE).await?;

    for &id in &unique {
        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM bets WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(LedgerError::RowNotFound(id));
        }
    }

    let mut deleted = 0u64;
    for &id in &unique {
        deleted += sqlx::query("DELETE FROM bets WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }

    let touched = recompute_from(&mut *tx, 0).await?;
    tx.commit().await?;

    metrics::counter!("bets_deleted_total").increment(deleted);
    refresh_gauges(pool).await;

    tracing::info!(
        ids = ?unique,
        deleted,
        cumulative_rows_rewritten = touched,
        "Bets deleted"
    );

    Ok(deleted)
}

/// All bets in insertion order.
pub async fn list_rows(pool: &SqlitePool) -> Result<Vec<Bet>, LedgerError> {
    let rows = sqlx::query_as::<_, BetRow>("SELECT * FROM bets ORDER BY id")
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(Bet::try_from).collect()
}

/// Get a single bet by id.
pub async fn get_row(pool: &SqlitePool, id: i64) -> Result<Bet, LedgerError> {
    let mut conn = pool.acquire().await?;
    fetch(&mut *conn, id).await
}

/// Count bets, optionally only those with the given result.
pub async fn count_rows(pool: &SqlitePool, result: Option<BetResult>) -> Result<i64, LedgerError> {
    let row: (i64,) = match result {
        Some(r) => {
            sqlx::query_as("SELECT COUNT(*) FROM bets WHERE result = ?1")
                .bind(r.as_str())
                .fetch_one(pool)
                .await?
        }
        None => sqlx::query_as("SELECT COUNT(*) FROM bets").fetch_one(pool).await?,
    };

    Ok(row.0)
}

async fn fetch(conn: &mut SqliteConnection, id: i64) -> Result<Bet, LedgerError> {
    let row = sqlx::query_as::<_, BetRow>("SELECT * FROM bets WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(LedgerError::RowNotFound(id))?;

    Bet::try_from(row)
}

/// Rewrite `cumulative_pnl` for every row with `id >= from_id`, continuing
/// from the cumulative value of the row just before it. Returns the number
/// of rows whose stored value changed.
async fn recompute_from(conn: &mut SqliteConnection, from_id: i64) -> Result<u64, LedgerError> {
    let base: Option<(i64, String)> = sqlx::query_as(
        "SELECT id, cumulative_pnl FROM bets WHERE id < ?1 ORDER BY id DESC LIMIT 1",
    )
    .bind(from_id)
    .fetch_optional(&mut *conn)
    .await?;

    let base = match base {
        Some((id, raw)) => parse_amount(id, "cumulative_pnl", &raw)?,
        None => Decimal::ZERO,
    };

    let rows: Vec<(i64, Option<String>, String)> = sqlx::query_as(
        "SELECT id, net_pnl, cumulative_pnl FROM bets WHERE id >= ?1 ORDER BY id",
    )
    .bind(from_id)
    .fetch_all(&mut *conn)
    .await?;

    let net_pnls = rows
        .iter()
        .map(|(id, net, _)| net.as_deref().map(|v| parse_amount(*id, "net_pnl", v)).transpose())
        .collect::<Result<Vec<_>, _>>()?;

    let totals = recompute_cumulative_from(base, &net_pnls)?;

    let mut touched = 0u64;
    for ((id, _, stored), total) in rows.iter().zip(totals) {
        if parse_amount(*id, "cumulative_pnl", stored)? == total {
            continue;
        }
        sqlx::query("UPDATE bets SET cumulative_pnl = ?1 WHERE id = ?2")
            .bind(amount(total))
            .bind(*id)
            .execute(&mut *conn)
            .await?;
        touched += 1;
    }

    Ok(touched)
}

async fn refresh_gauges(pool: &SqlitePool) {
    match count_rows(pool, Some(BetResult::Open)).await {
        Ok(open) => metrics::gauge!("open_bets").set(open as f64),
        Err(e) => tracing::warn!(error = %e, "Failed to count open bets"),
    }

    let last: Result<Option<(String,)>, sqlx::Error> =
        sqlx::query_as("SELECT cumulative_pnl FROM bets ORDER BY id DESC LIMIT 1")
            .fetch_optional(pool)
            .await;

    match last {
        Ok(row) => {
            let total = row
                .and_then(|(raw,)| Decimal::from_str(&raw).ok())
                .unwrap_or(Decimal::ZERO);
            metrics::gauge!("cumulative_pnl").set(total.to_f64().unwrap_or(0.0));
        }
        Err(e) => tracing::warn!(error = %e, "Failed to read cumulative PnL"),
    }
}
