use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use betledger::db::{self, bet_repo};
use betledger::models::{Bet, BetResult, NewBet};

/// Fresh in-memory ledger with the schema applied.
#[allow(dead_code)]
pub async fn setup_test_db() -> SqlitePool {
    db::init_pool("sqlite::memory:")
        .await
        .expect("Failed to open in-memory ledger")
}

/// Terms for a test bet placed on 9/11/25.
#[allow(dead_code)]
pub fn new_bet(sportsbook: &str, stake: i64, odds: i32, result: BetResult, bonus: bool) -> NewBet {
    NewBet {
        placed_on: NaiveDate::from_ymd_opt(2025, 9, 11).unwrap(),
        sportsbook: sportsbook.into(),
        league: "NFL".into(),
        market: "Moneyline".into(),
        pick: format!("{sportsbook} {odds:+}"),
        stake: Decimal::from(stake),
        american_odds: odds,
        result,
        bonus,
        profit_boost: Decimal::ZERO,
    }
}

/// Seed a bet through the row store.
#[allow(dead_code)]
pub async fn seed_bet(
    pool: &SqlitePool,
    sportsbook: &str,
    stake: i64,
    odds: i32,
    result: BetResult,
    bonus: bool,
) -> Bet {
    bet_repo::append_row(pool, new_bet(sportsbook, stake, odds, result, bonus))
        .await
        .expect("Failed to seed bet")
}
