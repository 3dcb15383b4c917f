pub mod bet;

pub use bet::{Bet, BetPatch, BetRow, NewBet};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SettlementError;

/// League choices offered by the logging form.
pub const LEAGUES: &[&str] = &["NFL", "NBA", "MLB", "NHL", "EPL", "UFC", "Other"];

/// Market choices offered by the logging form.
pub const MARKETS: &[&str] = &["Moneyline", "Spread", "Total", "Prop", "Parlay"];

// ---------------------------------------------------------------------------
// BetResult
// ---------------------------------------------------------------------------

/// Outcome of a wager. `Open` means the outcome is not known yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BetResult {
    #[default]
    Open,
    Win,
    Loss,
    Push,
}

impl BetResult {
    pub const ALL: [BetResult; 4] = [BetResult::Open, BetResult::Win, BetResult::Loss, BetResult::Push];

    pub fn is_settled(self) -> bool {
        self != BetResult::Open
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BetResult::Open => "Open",
            BetResult::Win => "Win",
            BetResult::Loss => "Loss",
            BetResult::Push => "Push",
        }
    }
}

impl FromStr for BetResult {
    type Err = SettlementError;

    /// Blank and "pending" are accepted as Open, matching how unsettled rows
    /// were historically left empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "open" | "pending" => Ok(BetResult::Open),
            "win" => Ok(BetResult::Win),
            "loss" => Ok(BetResult::Loss),
            "push" => Ok(BetResult::Push),
            _ => Err(SettlementError::InvalidResult(s.to_string())),
        }
    }
}

impl TryFrom<String> for BetResult {
    type Error = SettlementError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BetResult> for String {
    fn from(r: BetResult) -> Self {
        r.as_str().to_string()
    }
}

impl fmt::Display for BetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
