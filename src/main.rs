//! GTS trade history CLI
//!
//! Prints a Pokemon Global Link player's GTS trades as JSON.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use gts_history::models::parse_trade_date;
use gts_history::{GtsClient, GtsConfig, Language};

/// Pokemon Global Link GTS history CLI.
#[derive(Parser)]
#[command(name = "gts-history")]
#[command(about = "Fetch a player's GTS trade history", long_about = None)]
struct Cli {
    /// Public profile id of the player
    profile_id: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", env = "GTS_LOG_LEVEL")]
    log_level: String,

    /// Language of trade records (id 1-5 or name)
    #[arg(long)]
    language: Option<Language>,

    /// Timezone of trade dates (IANA name)
    #[arg(long)]
    timezone: Option<String>,

    /// Known account id (skips profile scraping together with --save-data-id)
    #[arg(long, requires = "save_data_id")]
    account_id: Option<String>,

    /// Known save-data id
    #[arg(long, requires = "account_id")]
    save_data_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the account and save-data ids
    Account,

    /// Show one page of trades
    Page {
        /// Trades per page
        #[arg(short, long, default_value = "5")]
        count: u32,

        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Show the most recent trade
    Latest,

    /// Show trades newer than a date
    Since {
        /// "YYYY/MM/DD HH:MM:SS" in the configured timezone, or Unix seconds
        date: String,
    },

    /// Show every trade
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = GtsConfig::from_env()?;
    if let Some(language) = cli.language {
        config.language = language;
    }
    if let Some(tz) = cli.timezone {
        config.timezone = tz
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .context("Invalid --timezone")?;
    }
    let timezone = config.timezone;

    let mut client = GtsClient::with_config(&cli.profile_id, config)?;
    if let (Some(account_id), Some(save_data_id)) = (cli.account_id, cli.save_data_id) {
        client = client.with_account_data(account_id, save_data_id);
    }

    match cli.command {
        Commands::Account => {
            let data = client.fetch_account_data().await?;
            print_json(&data)?;
        }

        Commands::Page { count, page } => {
            let result = client.fetch_trade_page(count, page).await?;
            print_json(&result)?;
        }

        Commands::Latest => {
            let trade = client.fetch_latest_trade().await?;
            print_json(&trade)?;
        }

        Commands::Since { date } => {
            let since = parse_since(&date, timezone)?;
            info!(since = %since, "Fetching trades");

            let trades = client.fetch_trades_since(since).await?;
            info!(count = trades.len(), "Fetched trades");
            print_json(&trades)?;
        }

        Commands::All => {
            let trades = client.fetch_all_trades().await?;
            info!(count = trades.len(), "Fetched trades");
            print_json(&trades)?;
        }
    }

    Ok(())
}

/// Accept Unix seconds or a date in the portal's format.
fn parse_since(value: &str, tz: Tz) -> Result<DateTime<Utc>> {
    if let Ok(secs) = value.trim().parse::<i64>() {
        return DateTime::from_timestamp(secs, 0)
            .with_context(|| format!("Timestamp out of range: {}", secs));
    }

    Ok(parse_trade_date(value, tz)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
