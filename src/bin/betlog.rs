//! betlog - log, settle and review bets from the command line

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use betledger::config::{init_tracing, AppConfig};
use betledger::db::{self, bet_repo};
use betledger::models::{Bet, BetPatch, BetResult, NewBet};
use betledger::reporting::{as_percent, calculate_kpis, pnl_by_sportsbook};
use betledger::settlement::{self, Wager};

#[derive(Parser)]
#[command(name = "betlog")]
#[command(author, version, about = "Sports bet ledger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Ledger database (overrides DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a new bet
    Log {
        /// Date placed (YYYY-MM-DD or MM/DD/YY), defaults to today
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        #[arg(long)]
        sportsbook: String,

        /// NFL, NBA, MLB, NHL, EPL, UFC or Other
        #[arg(long)]
        league: String,

        /// Moneyline, Spread, Total, Prop or Parlay
        #[arg(long)]
        market: String,

        /// Pick / wager description
        #[arg(long)]
        pick: String,

        /// American odds, e.g. -110 or +375
        #[arg(long, allow_negative_numbers = true)]
        odds: i32,

        #[arg(long)]
        stake: Decimal,

        /// Open, Win, Loss or Push
        #[arg(long, default_value = "Open")]
        result: BetResult,

        /// Stake is a bonus bet credit
        #[arg(long)]
        bonus: bool,

        /// Profit boost in percent
        #[arg(long, default_value = "0")]
        boost: Decimal,
    },

    /// Edit or settle an existing bet
    Update {
        id: i64,

        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        #[arg(long)]
        sportsbook: Option<String>,

        #[arg(long)]
        league: Option<String>,

        #[arg(long)]
        market: Option<String>,

        #[arg(long)]
        pick: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        odds: Option<i32>,

        #[arg(long)]
        stake: Option<Decimal>,

        #[arg(long)]
        result: Option<BetResult>,

        #[arg(long)]
        bonus: Option<bool>,

        #[arg(long)]
        boost: Option<Decimal>,
    },

    /// Delete one or more bets
    Delete {
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Show the bet log
    List,

    /// Show KPIs and PnL by sportsbook
    Dashboard,

    /// Settle a hypothetical bet without touching the ledger
    Settle {
        #[arg(long, allow_negative_numbers = true)]
        odds: i32,

        #[arg(long)]
        stake: Decimal,

        #[arg(long, default_value = "Win")]
        result: BetResult,

        #[arg(long)]
        bonus: bool,

        #[arg(long, default_value = "0")]
        boost: Decimal,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%y"))
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .map_err(|_| format!("invalid date {s:?}, expected YYYY-MM-DD or MM/DD/YY"))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }
    init_tracing(config.log_format, "warn");

    match cli.command {
        Commands::Settle {
            odds,
            stake,
            result,
            bonus,
            boost,
        } => run_settle(odds, stake, result, bonus, boost)?,

        Commands::Log {
            date,
            sportsbook,
            league,
            market,
            pick,
            odds,
            stake,
            result,
            bonus,
            boost,
        } => {
            let pool = open_ledger(&config.database_url).await?;
            let bet = bet_repo::append_row(
                &pool,
                NewBet {
                    placed_on: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
                    sportsbook,
                    league,
                    market,
                    pick,
                    stake,
                    american_odds: odds,
                    result,
                    bonus,
                    profit_boost: boost,
                },
            )
            .await?;
            println!("Logged bet #{}: {} ({})", bet.id, bet.pick, bet.sportsbook);
            print_bets(&[bet]);
        }

        Commands::Update {
            id,
            date,
            sportsbook,
            league,
            market,
            pick,
            odds,
            stake,
            result,
            bonus,
            boost,
        } => {
            let patch = BetPatch {
                placed_on: date,
                sportsbook,
                league,
                market,
                pick,
                stake,
                american_odds: odds,
                result,
                bonus,
                profit_boost: boost,
            };
            if patch.is_empty() {
                anyhow::bail!("Nothing to update for bet #{id}");
            }
            let pool = open_ledger(&config.database_url).await?;
            let bet = bet_repo::update_row(&pool, id, patch).await?;
            println!("Updated bet #{}", bet.id);
            print_bets(&[bet]);
        }

        Commands::Delete { ids } => {
            let pool = open_ledger(&config.database_url).await?;
            let deleted = bet_repo::delete_rows(&pool, &ids).await?;
            println!("Deleted {deleted} bet(s)");
        }

        Commands::List => {
            let pool = open_ledger(&config.database_url).await?;
            let bets = bet_repo::list_rows(&pool).await?;
            if bets.is_empty() {
                println!("No bets logged yet.");
            } else {
                print_bets(&bets);
            }
        }

        Commands::Dashboard => {
            let pool = open_ledger(&config.database_url).await?;
            let bets = bet_repo::list_rows(&pool).await?;
            print_dashboard(&bets);
        }
    }

    Ok(())
}

async fn open_ledger(url: &str) -> Result<SqlitePool> {
    db::init_pool(url)
        .await
        .with_context(|| format!("Failed to open ledger {url}"))
}

fn run_settle(odds: i32, stake: Decimal, result: BetResult, bonus: bool, boost: Decimal) -> Result<()> {
    let s = settlement::settle(&Wager {
        stake,
        american_odds: odds,
        result,
        bonus,
        profit_boost: boost,
    })?;

    println!("Decimal odds:  {}", s.decimal_odds.round_dp(4));
    println!("Stake at risk: {}", s.stake_at_risk.round_dp(2));
    println!("Payout:        {}", money(s.payout));
    println!("Net PnL:       {}", money(s.net_pnl));
    Ok(())
}

fn money(v: Option<Decimal>) -> String {
    v.map(|d| d.round_dp(2).to_string()).unwrap_or_else(|| "-".into())
}

fn print_bets(bets: &[Bet]) {
    println!(
        "{:>4}  {:<10}  {:<12}  {:<6}  {:<10}  {:<28}  {:>8}  {:>6}  {:<5}  {:>5}  {:>9}  {:>9}  {:>10}",
        "ID", "Date", "Sportsbook", "League", "Market", "Pick", "Stake", "Odds", "Res", "Bonus", "Payout", "Net", "Cumulative"
    );
    for b in bets {
        let pick: String = b.pick.chars().take(28).collect();
        println!(
            "{:>4}  {:<10}  {:<12}  {:<6}  {:<10}  {:<28}  {:>8}  {:>+6}  {:<5}  {:>5}  {:>9}  {:>9}  {:>10}",
            b.id,
            b.placed_on.to_string(),
            b.sportsbook,
            b.league,
            b.market,
            pick,
            b.stake.round_dp(2).to_string(),
            b.american_odds,
            b.result.as_str(),
            if b.bonus { "yes" } else { "" },
            money(b.payout),
            money(b.net_pnl),
            b.cumulative_pnl.round_dp(2).to_string(),
        );
    }
}

fn print_dashboard(bets: &[Bet]) {
    let k = calculate_kpis(bets);

    println!("Total PnL ($):   {}", k.total_pnl.round_dp(2));
    println!("Total Stake ($): {}", k.total_stake.round_dp(2));
    println!("Win %:           {}%", as_percent(k.win_rate));
    println!("ROI (%):         {}%", as_percent(k.roi));
    println!("Max drawdown:    {}", k.max_drawdown.round_dp(2));
    println!(
        "Bets:            {} ({} settled: {}W/{}L/{}P, {} pending, {} bonus)",
        k.total_bets, k.settled_bets, k.wins, k.losses, k.pushes, k.pending_bets, k.bonus_bets
    );

    let bars = pnl_by_sportsbook(bets);
    if !bars.is_empty() {
        println!();
        println!("{:<16}  {:>5}  {:>10}", "Sportsbook", "Bets", "Net PnL");
        for bar in bars {
            println!("{:<16}  {:>5}  {:>10}", bar.sportsbook, bar.bets, bar.net_pnl.round_dp(2).to_string());
        }
    }
}
