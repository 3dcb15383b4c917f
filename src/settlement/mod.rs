//! Bet settlement math: odds conversion, payout and net PnL for a single
//! wager, and the running cumulative PnL over the ledger.

pub mod calculator;
pub mod cumulative;

pub use calculator::{
    american_to_decimal, settle, validate, Settlement, Wager, MAX_PROFIT_BOOST, MAX_STAKE,
};
pub use cumulative::{recompute_cumulative, recompute_cumulative_from};
