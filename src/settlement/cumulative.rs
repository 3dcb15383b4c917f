use rust_decimal::Decimal;

use crate::errors::SettlementError;

/// Running sum of net PnL in entry order.
///
/// `None` marks a pending row: it adds nothing and carries the previous
/// total at its position.
pub fn recompute_cumulative(net_pnls: &[Option<Decimal>]) -> Result<Vec<Decimal>, SettlementError> {
    recompute_cumulative_from(Decimal::ZERO, net_pnls)
}

/// Same as [`recompute_cumulative`] but continuing from an existing total,
/// e.g. the cumulative value of the row just before the first changed one.
pub fn recompute_cumulative_from(
    base: Decimal,
    net_pnls: &[Option<Decimal>],
) -> Result<Vec<Decimal>, SettlementError> {
    let mut total = base;
    net_pnls
        .iter()
        .map(|pnl| {
            if let Some(p) = pnl {
                total = total
                    .checked_add(*p)
                    .ok_or(SettlementError::AmountOutOfRange("cumulative_pnl"))?;
            }
            Ok(total)
        })
        .collect()
}
