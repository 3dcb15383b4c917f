use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

use super::{BetResult, LEAGUES, MARKETS};
use crate::errors::LedgerError;
use crate::settlement::Wager;

/// A logged wager with its derived settlement fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: i64,
    pub placed_on: NaiveDate,
    pub sportsbook: String,
    pub league: String,
    pub market: String,
    pub pick: String,
    pub stake: Decimal,
    pub american_odds: i32,
    pub result: BetResult,
    pub bonus: bool,
    pub profit_boost: Decimal,

    // Derived
    pub decimal_odds: Decimal,
    pub payout: Option<Decimal>,
    pub net_pnl: Option<Decimal>,
    pub cumulative_pnl: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bet {
    pub fn wager(&self) -> Wager {
        Wager {
            stake: self.stake,
            american_odds: self.american_odds,
            result: self.result,
            bonus: self.bonus,
            profit_boost: self.profit_boost,
        }
    }

    /// Cash actually risked: zero for bonus bets.
    pub fn stake_at_risk(&self) -> Decimal {
        if self.bonus {
            Decimal::ZERO
        } else {
            self.stake
        }
    }

    pub fn is_settled(&self) -> bool {
        self.result.is_settled()
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Terms of a wager about to be logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBet {
    #[serde(default = "today")]
    pub placed_on: NaiveDate,
    pub sportsbook: String,
    #[serde(default)]
    pub league: String,
    #[serde(default)]
    pub market: String,
    pub pick: String,
    pub stake: Decimal,
    pub american_odds: i32,
    #[serde(default)]
    pub result: BetResult,
    #[serde(default)]
    pub bonus: bool,
    #[serde(default)]
    pub profit_boost: Decimal,
}

impl NewBet {
    pub fn wager(&self) -> Wager {
        Wager {
            stake: self.stake,
            american_odds: self.american_odds,
            result: self.result,
            bonus: self.bonus,
            profit_boost: self.profit_boost,
        }
    }

    /// Reject blank identifying fields and unknown league or market. Text is
    /// trimmed and choices take their canonical spelling.
    pub fn normalize(&mut self) -> Result<(), LedgerError> {
        self.sportsbook = self.sportsbook.trim().to_string();
        self.pick = self.pick.trim().to_string();

        if self.sportsbook.is_empty() {
            return Err(LedgerError::MissingField("sportsbook"));
        }
        self.league = choose("league", &self.league, LEAGUES)?;
        self.market = choose("market", &self.market, MARKETS)?;
        if self.pick.is_empty() {
            return Err(LedgerError::MissingField("pick"));
        }
        Ok(())
    }
}

fn choose(
    field: &'static str,
    value: &str,
    options: &'static [&'static str],
) -> Result<String, LedgerError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LedgerError::MissingField(field));
    }
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(value))
        .map(|o| o.to_string())
        .ok_or_else(|| LedgerError::InvalidChoice {
            field,
            value: value.to_string(),
            options,
        })
}

/// Partial edit of a logged bet. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BetPatch {
    pub placed_on: Option<NaiveDate>,
    pub sportsbook: Option<String>,
    pub league: Option<String>,
    pub market: Option<String>,
    pub pick: Option<String>,
    pub stake: Option<Decimal>,
    pub american_odds: Option<i32>,
    pub result: Option<BetResult>,
    pub bonus: Option<bool>,
    pub profit_boost: Option<Decimal>,
}

impl BetPatch {
    pub fn is_empty(&self) -> bool {
        *self == BetPatch::default()
    }

    /// Apply onto the editable terms of `bet`, returning them as a `NewBet`
    /// so they go through the same validation as a fresh entry.
    pub fn apply(self, bet: &Bet) -> NewBet {
        NewBet {
            placed_on: self.placed_on.unwrap_or(bet.placed_on),
            sportsbook: self.sportsbook.unwrap_or_else(|| bet.sportsbook.clone()),
            league: self.league.unwrap_or_else(|| bet.league.clone()),
            market: self.market.unwrap_or_else(|| bet.market.clone()),
            pick: self.pick.unwrap_or_else(|| bet.pick.clone()),
            stake: self.stake.unwrap_or(bet.stake),
            american_odds: self.american_odds.unwrap_or(bet.american_odds),
            result: self.result.unwrap_or(bet.result),
            bonus: self.bonus.unwrap_or(bet.bonus),
            profit_boost: self.profit_boost.unwrap_or(bet.profit_boost),
        }
    }
}

/// Database row for the bets table. Amounts are stored as decimal text.
#[derive(Debug, Clone, FromRow)]
pub struct BetRow {
    pub id: i64,
    pub placed_on: NaiveDate,
    pub sportsbook: String,
    pub league: String,
    pub market: String,
    pub pick: String,
    pub stake: String,
    pub american_odds: i32,
    pub result: String,
    pub bonus: bool,
    pub profit_boost: String,
    pub decimal_odds: String,
    pub payout: Option<String>,
    pub net_pnl: Option<String>,
    pub cumulative_pnl: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parse a stored amount column, naming the row and column on failure.
pub(crate) fn parse_amount(id: i64, column: &str, raw: &str) -> Result<Decimal, LedgerError> {
    Decimal::from_str(raw)
        .map_err(|e| LedgerError::Corrupt(format!("bet {id} {column}={raw:?}: {e}")))
}

impl TryFrom<BetRow> for Bet {
    type Error = LedgerError;

    fn try_from(row: BetRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let result = BetResult::from_str(&row.result)
            .map_err(|e| LedgerError::Corrupt(format!("bet {id} result: {e}")))?;

        Ok(Bet {
            id,
            placed_on: row.placed_on,
            sportsbook: row.sportsbook,
            league: row.league,
            market: row.market,
            pick: row.pick,
            stake: parse_amount(id, "stake", &row.stake)?,
            american_odds: row.american_odds,
            result,
            bonus: row.bonus,
            profit_boost: parse_amount(id, "profit_boost", &row.profit_boost)?,
            decimal_odds: parse_amount(id, "decimal_odds", &row.decimal_odds)?,
            payout: row
                .payout
                .as_deref()
                .map(|v| parse_amount(id, "payout", v))
                .transpose()?,
            net_pnl: row
                .net_pnl
                .as_deref()
                .map(|v| parse_amount(id, "net_pnl", v))
                .transpose()?,
            cumulative_pnl: parse_amount(id, "cumulative_pnl", &row.cumulative_pnl)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bet() -> Bet {
        Bet {
            id: 1,
            placed_on: NaiveDate::from_ymd_opt(2025, 9, 11).unwrap(),
            sportsbook: "Fanatics".into(),
            league: "NFL".into(),
            market: "Total".into(),
            pick: "Commanders vs Packers - Odd".into(),
            stake: Decimal::from(100),
            american_odds: -125,
            result: BetResult::Open,
            bonus: true,
            profit_boost: Decimal::ZERO,
            decimal_odds: Decimal::new(18, 1),
            payout: None,
            net_pnl: None,
            cumulative_pnl: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_stake_at_risk_bonus() {
        let mut bet = sample_bet();
        assert_eq!(bet.stake_at_risk(), Decimal::ZERO);
        bet.bonus = false;
        assert_eq!(bet.stake_at_risk(), Decimal::from(100));
    }

    #[test]
    fn test_patch_apply_keeps_unset_fields() {
        let bet = sample_bet();
        let patch = BetPatch {
            result: Some(BetResult::Win),
            ..Default::default()
        };
        let applied = patch.apply(&bet);
        assert_eq!(applied.result, BetResult::Win);
        assert_eq!(applied.sportsbook, "Fanatics");
        assert_eq!(applied.american_odds, -125);
        assert!(applied.bonus);
    }

    #[test]
    fn test_normalize_rejects_blank_fields() {
        let mut new_bet = BetPatch::default().apply(&sample_bet());
        new_bet.sportsbook = "   ".into();
        assert!(matches!(new_bet.normalize(), Err(LedgerError::MissingField("sportsbook"))));

        new_bet.sportsbook = " Hard Rock ".into();
        new_bet.pick = String::new();
        assert!(matches!(new_bet.normalize(), Err(LedgerError::MissingField("pick"))));

        new_bet.pick = "Reds ML".into();
        new_bet.normalize().unwrap();
        assert_eq!(new_bet.sportsbook, "Hard Rock");
    }

    #[test]
    fn test_normalize_requires_league_and_market() {
        let mut new_bet = BetPatch::default().apply(&sample_bet());
        new_bet.league = " ".into();
        assert!(matches!(new_bet.normalize(), Err(LedgerError::MissingField("league"))));

        new_bet.league = "Curling".into();
        assert!(matches!(
            new_bet.normalize(),
            Err(LedgerError::InvalidChoice { field: "league", .. })
        ));

        new_bet.league = "nfl".into();
        new_bet.market = String::new();
        assert!(matches!(new_bet.normalize(), Err(LedgerError::MissingField("market"))));

        new_bet.market = " prop ".into();
        new_bet.normalize().unwrap();
        assert_eq!(new_bet.league, "NFL");
        assert_eq!(new_bet.market, "Prop");
    }

    #[test]
    fn test_row_with_bad_amount_is_corrupt() {
        let bet = sample_bet();
        let row = BetRow {
            id: bet.id,
            placed_on: bet.placed_on,
            sportsbook: bet.sportsbook,
            league: bet.league,
            market: bet.market,
            pick: bet.pick,
            stake: "ten".into(),
            american_odds: bet.american_odds,
            result: "Open".into(),
            bonus: bet.bonus,
            profit_boost: "0".into(),
            decimal_odds: "1.8".into(),
            payout: None,
            net_pnl: None,
            cumulative_pnl: "0".into(),
            created_at: bet.created_at,
            updated_at: bet.updated_at,
        };
        assert!(matches!(Bet::try_from(row), Err(LedgerError::Corrupt(_))));
    }

    #[test]
    fn test_patch_deserializes_partial() {
        let patch: BetPatch = serde_json::from_str(r#"{"result":"Win"}"#).unwrap();
        assert_eq!(patch.result, Some(BetResult::Win));
        assert!(patch.stake.is_none());
        assert!(BetPatch::default().is_empty());
        assert!(!patch.is_empty());
    }
}
