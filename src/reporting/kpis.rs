//! Dashboard KPIs computed from the ledger rows.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Bet, BetResult};

/// Aggregate ledger KPIs. Rates are fractions (0.25 = 25%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerKpis {
    pub total_bets: usize,
    pub settled_bets: usize,
    pub pending_bets: usize,
    pub wins: usize,
    pub losses: usize,
    pub pushes: usize,
    pub bonus_bets: usize,

    pub total_pnl: Decimal,
    pub total_stake: Decimal,
    pub win_rate: Decimal,
    pub roi: Decimal,
    pub max_drawdown: Decimal,
}

impl Default for LedgerKpis {
    fn default() -> Self {
        Self {
            total_bets: 0,
            settled_bets: 0,
            pending_bets: 0,
            wins: 0,
            losses: 0,
            pushes: 0,
            bonus_bets: 0,
            total_pnl: Decimal::ZERO,
            total_stake: Decimal::ZERO,
            win_rate: Decimal::ZERO,
            roi: Decimal::ZERO,
            max_drawdown: Decimal::ZERO,
        }
    }
}

/// Calculate KPIs over bets in entry order.
pub fn calculate_kpis(bets: &[Bet]) -> LedgerKpis {
    if bets.is_empty() {
        return LedgerKpis::default();
    }

    let count = |r: BetResult| bets.iter().filter(|b| b.result == r).count();
    let wins = count(BetResult::Win);
    let losses = count(BetResult::Loss);
    let pushes = count(BetResult::Push);
    let settled_bets = wins + losses + pushes;

    let settled = || bets.iter().filter(|b| b.is_settled());
    let total_pnl = settled()
        .filter_map(|b| b.net_pnl)
        .fold(Decimal::ZERO, Decimal::saturating_add);
    let total_stake = settled()
        .map(Bet::stake_at_risk)
        .fold(Decimal::ZERO, Decimal::saturating_add);

    let win_rate = if settled_bets > 0 {
        Decimal::from(wins) / Decimal::from(settled_bets)
    } else {
        Decimal::ZERO
    };

    let roi = if total_stake.is_zero() {
        Decimal::ZERO
    } else {
        total_pnl.checked_div(total_stake).unwrap_or(if total_pnl.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
    };

    LedgerKpis {
        total_bets: bets.len(),
        settled_bets,
        pending_bets: bets.len() - settled_bets,
        wins,
        losses,
        pushes,
        bonus_bets: bets.iter().filter(|b| b.bonus).count(),
        total_pnl,
        total_stake,
        win_rate,
        roi,
        max_drawdown: max_drawdown(bets.iter().map(|b| b.cumulative_pnl)),
    }
}

/// Largest fall from a running peak of the cumulative PnL curve. The curve
/// starts at zero before the first bet.
pub fn max_drawdown(cumulative: impl IntoIterator<Item = Decimal>) -> Decimal {
    let mut peak = Decimal::ZERO;
    let mut worst = Decimal::ZERO;
    for value in cumulative {
        peak = peak.max(value);
        worst = worst.max(peak.saturating_sub(value));
    }
    worst
}

/// Fraction as a percentage rounded for display, e.g. 0.12345 → 12.35.
pub fn as_percent(fraction: Decimal) -> Decimal {
    fraction.saturating_mul(Decimal::ONE_HUNDRED).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::{recompute_cumulative, settle, Wager};
    use chrono::{NaiveDate, Utc};

    /// Build settled bets the way the store would.
    fn ledger(entries: &[(i64, i32, BetResult, bool)]) -> Vec<Bet> {
        let settlements: Vec<_> = entries
            .iter()
            .map(|&(stake, odds, result, bonus)| {
                settle(&Wager {
                    stake: Decimal::from(stake),
                    american_odds: odds,
                    result,
                    bonus,
                    profit_boost: Decimal::ZERO,
                })
                .unwrap()
            })
            .collect();
        let cumulative =
            recompute_cumulative(&settlements.iter().map(|s| s.net_pnl).collect::<Vec<_>>()).unwrap();

        entries
            .iter()
            .zip(settlements)
            .zip(cumulative)
            .enumerate()
            .map(|(i, ((&(stake, odds, result, bonus), s), cum))| Bet {
                id: i as i64 + 1,
                placed_on: NaiveDate::from_ymd_opt(2025, 9, 11).unwrap(),
                sportsbook: if i % 2 == 0 { "Fanatics" } else { "Hard Rock" }.into(),
                league: "NFL".into(),
                market: "Moneyline".into(),
                pick: format!("pick {i}"),
                stake: Decimal::from(stake),
                american_odds: odds,
                result,
                bonus,
                profit_boost: Decimal::ZERO,
                decimal_odds: s.decimal_odds,
                payout: s.payout,
                net_pnl: s.net_pnl,
                cumulative_pnl: cum,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn test_empty_ledger() {
        assert_eq!(calculate_kpis(&[]), LedgerKpis::default());
    }

    #[test]
    fn test_sample_week() {
        // The four bets logged on 9/11/25.
        let bets = ledger(&[
            (10, -170, BetResult::Loss, false),
            (5, -950, BetResult::Win, false),
            (80, 125, BetResult::Loss, false),
            (100, -125, BetResult::Win, true),
        ]);
        let k = calculate_kpis(&bets);

        assert_eq!(k.total_bets, 4);
        assert_eq!(k.settled_bets, 4);
        assert_eq!(k.wins, 2);
        assert_eq!(k.losses, 2);
        assert_eq!(k.bonus_bets, 1);
        // -10 + 0.526 - 80 + 80
        assert_eq!(k.total_pnl.round_dp(2), Decimal::new(-947, 2));
        assert_eq!(k.total_stake, Decimal::from(95));
        assert_eq!(k.win_rate, Decimal::new(5, 1));
        assert_eq!(as_percent(k.roi), Decimal::new(-997, 2));
    }

    #[test]
    fn test_pending_rows_excluded() {
        let bets = ledger(&[
            (20, 150, BetResult::Win, false),
            (50, -110, BetResult::Open, false),
        ]);
        let k = calculate_kpis(&bets);

        assert_eq!(k.pending_bets, 1);
        assert_eq!(k.total_stake, Decimal::from(20));
        assert_eq!(k.total_pnl, Decimal::from(30));
        assert_eq!(k.win_rate, Decimal::ONE);
    }

    #[test]
    fn test_push_counts_as_settled() {
        let bets = ledger(&[
            (10, 100, BetResult::Win, false),
            (10, 100, BetResult::Push, false),
        ]);
        let k = calculate_kpis(&bets);
        assert_eq!(k.win_rate, Decimal::new(5, 1));
    }

    #[test]
    fn test_roi_zero_without_cash_stake() {
        let bets = ledger(&[(25, 200, BetResult::Win, true)]);
        let k = calculate_kpis(&bets);
        assert_eq!(k.total_stake, Decimal::ZERO);
        assert_eq!(k.total_pnl, Decimal::from(50));
        assert_eq!(k.roi, Decimal::ZERO);
    }

    #[test]
    fn test_max_drawdown() {
        let curve = [10, 25, 5, 15, -10, 0].map(Decimal::from);
        assert_eq!(max_drawdown(curve), Decimal::from(35));
        assert_eq!(max_drawdown([Decimal::from(-4)]), Decimal::from(4));
        assert_eq!(max_drawdown(Vec::<Decimal>::new()), Decimal::ZERO);
    }

    #[test]
    fn test_extreme_values_saturate() {
        let curve = [Decimal::MAX, Decimal::MIN];
        assert_eq!(max_drawdown(curve), Decimal::MAX);
        assert_eq!(as_percent(Decimal::MAX), Decimal::MAX);

        let mut bets = ledger(&[(10, 100, BetResult::Win, false), (10, 100, BetResult::Win, false)]);
        for b in &mut bets {
            b.stake = Decimal::new(1, 28);
            b.net_pnl = Some(Decimal::MAX);
        }
        let k = calculate_kpis(&bets);
        assert_eq!(k.total_pnl, Decimal::MAX);
        assert_eq!(k.roi, Decimal::MAX);
    }
}
