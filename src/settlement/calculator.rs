use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::SettlementError;
use crate::models::BetResult;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Largest stake accepted, in dollars.
pub const MAX_STAKE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Largest profit boost accepted, in percent.
pub const MAX_PROFIT_BOOST: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// The terms of a wager that matter to settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wager {
    pub stake: Decimal,
    pub american_odds: i32,
    pub result: BetResult,
    /// Stake is a free/bonus credit rather than the bettor's cash.
    pub bonus: bool,
    /// Percentage applied to profit only.
    pub profit_boost: Decimal,
}

/// Derived settlement fields for one wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub decimal_odds: Decimal,
    pub stake_at_risk: Decimal,
    /// `None` while the bet is open.
    pub payout: Option<Decimal>,
    /// `None` while the bet is open.
    pub net_pnl: Option<Decimal>,
}

/// Convert American odds to decimal odds.
///
/// Positive odds pay `odds` per 100 staked, negative odds require `|odds|`
/// staked to win 100. Zero has no meaning and is rejected.
pub fn american_to_decimal(odds: i32) -> Result<Decimal, SettlementError> {
    if odds == 0 {
        return Err(SettlementError::InvalidOdds);
    }

    let odds = Decimal::from(odds);
    if odds > Decimal::ZERO {
        Ok(Decimal::ONE + odds / HUNDRED)
    } else {
        Ok(Decimal::ONE + HUNDRED / odds.abs())
    }
}

/// Check the inputs `settle` depends on without computing anything.
pub fn validate(wager: &Wager) -> Result<(), SettlementError> {
    if wager.stake.is_sign_negative() && !wager.stake.is_zero() {
        return Err(SettlementError::NegativeStake(wager.stake));
    }
    if wager.american_odds == 0 {
        return Err(SettlementError::InvalidOdds);
    }
    if wager.profit_boost.is_sign_negative() && !wager.profit_boost.is_zero() {
        return Err(SettlementError::NegativeProfitBoost(wager.profit_boost));
    }
    if wager.stake > MAX_STAKE {
        return Err(SettlementError::AmountOutOfRange("stake"));
    }
    if wager.profit_boost > MAX_PROFIT_BOOST {
        return Err(SettlementError::AmountOutOfRange("profit_boost"));
    }
    Ok(())
}

/// Settle a wager into payout and net PnL.
///
/// - Win pays boosted profit, plus the stake back when it was cash.
/// - Push returns the cash stake only; a bonus push returns nothing.
/// - Loss pays nothing.
/// - Open leaves payout and net PnL unset.
pub fn settle(wager: &Wager) -> Result<Settlement, SettlementError> {
    validate(wager)?;

    let decimal_odds = american_to_decimal(wager.american_odds)?;
    let stake_at_risk = if wager.bonus { Decimal::ZERO } else { wager.stake };

    let payout = match wager.result {
        BetResult::Open => None,
        BetResult::Win => Some(win_payout(decimal_odds, stake_at_risk, wager)?),
        BetResult::Push => Some(stake_at_risk),
        BetResult::Loss => Some(Decimal::ZERO),
    };

    let net_pnl = payout
        .map(|p| {
            p.checked_sub(stake_at_risk)
                .ok_or(SettlementError::AmountOutOfRange("net_pnl"))
        })
        .transpose()?;

    Ok(Settlement {
        decimal_odds,
        stake_at_risk,
        payout,
        net_pnl,
    })
}

fn win_payout(
    decimal_odds: Decimal,
    stake_at_risk: Decimal,
    wager: &Wager,
) -> Result<Decimal, SettlementError> {
    let multiplier = Decimal::ONE + wager.profit_boost / HUNDRED;

    (decimal_odds - Decimal::ONE)
        .checked_mul(wager.stake)
        .and_then(|profit| profit.checked_mul(multiplier))
        .and_then(|boosted| boosted.checked_add(stake_at_risk))
        .ok_or(SettlementError::AmountOutOfRange("payout"))
}
