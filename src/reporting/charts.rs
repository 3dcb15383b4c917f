use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Bet;

/// One point of the cumulative PnL line, per ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PnlPoint {
    pub id: i64,
    pub date: NaiveDate,
    pub net_pnl: Option<Decimal>,
    pub cumulative_pnl: Decimal,
}

/// Net PnL bar for one sportsbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SportsbookPnl {
    pub sportsbook: String,
    pub bets: usize,
    pub settled_bets: usize,
    pub net_pnl: Decimal,
}

pub fn cumulative_series(bets: &[Bet]) -> Vec<PnlPoint> {
    bets.iter()
        .map(|b| PnlPoint {
            id: b.id,
            date: b.placed_on,
            net_pnl: b.net_pnl,
            cumulative_pnl: b.cumulative_pnl,
        })
        .collect()
}

/// Settled net PnL grouped by sportsbook, sorted by name.
pub fn pnl_by_sportsbook(bets: &[Bet]) -> Vec<SportsbookPnl> {
    let mut groups: BTreeMap<&str, SportsbookPnl> = BTreeMap::new();

    for bet in bets {
        let entry = groups.entry(bet.sportsbook.as_str()).or_insert_with(|| SportsbookPnl {
            sportsbook: bet.sportsbook.clone(),
            bets: 0,
            settled_bets: 0,
            net_pnl: Decimal::ZERO,
        });
        entry.bets += 1;
        if let Some(pnl) = bet.net_pnl {
            entry.settled_bets += 1;
            entry.net_pnl = entry.net_pnl.saturating_add(pnl);
        }
    }

    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BetResult;
    use chrono::Utc;

    fn bet(id: i64, book: &str, net: Option<i64>, cum: i64) -> Bet {
        Bet {
            id,
            placed_on: NaiveDate::from_ymd_opt(2025, 9, id as u32).unwrap(),
            sportsbook: book.into(),
            league: "MLB".into(),
            market: "Moneyline".into(),
            pick: "Reds".into(),
            stake: Decimal::from(10),
            american_odds: 100,
            result: if net.is_some() { BetResult::Win } else { BetResult::Open },
            bonus: false,
            profit_boost: Decimal::ZERO,
            decimal_odds: Decimal::from(2),
            payout: None,
            net_pnl: net.map(Decimal::from),
            cumulative_pnl: Decimal::from(cum),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_cumulative_series_follows_entry_order() {
        let bets = vec![bet(1, "Fanatics", Some(-10), -10), bet(2, "Hard Rock", None, -10)];
        let series = cumulative_series(&bets);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].id, 1);
        assert_eq!(series[1].net_pnl, None);
        assert_eq!(series[1].cumulative_pnl, Decimal::from(-10));
    }

    #[test]
    fn test_pnl_by_sportsbook() {
        let bets = vec![
            bet(1, "Hard Rock", Some(5), 5),
            bet(2, "Fanatics", Some(-10), -5),
            bet(3, "Hard Rock", Some(-80), -85),
            bet(4, "Fanatics", None, -85),
        ];
        let bars = pnl_by_sportsbook(&bets);

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].sportsbook, "Fanatics");
        assert_eq!(bars[0].bets, 2);
        assert_eq!(bars[0].settled_bets, 1);
        assert_eq!(bars[0].net_pnl, Decimal::from(-10));
        assert_eq!(bars[1].sportsbook, "Hard Rock");
        assert_eq!(bars[1].net_pnl, Decimal::from(-75));
    }
}
