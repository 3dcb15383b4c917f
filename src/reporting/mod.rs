//! Read-only views over the ledger: KPIs and chart series.

pub mod charts;
pub mod kpis;

pub use charts::{cumulative_series, pnl_by_sportsbook, PnlPoint, SportsbookPnl};
pub use kpis::{as_percent, calculate_kpis, max_drawdown, LedgerKpis};
