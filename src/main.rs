use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tootboard::analytics::Timeframe;
use tootboard::clock::{Clock, SystemClock};
use tootboard::config::ResolvedConfig;
use tootboard::models::{Account, Id, Metric};
use tootboard::reporting::ReportService;
use tootboard::storage::{JsonFileStorage, SnapshotStore};

#[derive(Parser)]
#[command(name = "tootboard")]
#[command(about = "Mastodon account analytics")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "tootboard.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show current configuration
    Config,
    /// List tracked accounts
    Accounts,
    /// Period KPIs (week/month/year + total) for an account
    Kpi {
        /// Account id
        account: String,
        #[arg(long, default_value = "followers")]
        metric: Metric,
    },
    /// Day-over-day chart series
    Chart {
        /// Account id
        account: String,
        #[arg(long, default_value = "followers")]
        metric: Metric,
        /// Timeframe token (unknown tokens fall back to last30days)
        #[arg(long)]
        timeframe: Option<String>,
    },
    /// Write a CSV export of the chart series
    Export {
        /// Account id
        account: String,
        #[arg(long, default_value = "followers")]
        metric: Metric,
        #[arg(long)]
        timeframe: Option<String>,
        /// Output path; defaults to the export's own filename
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

async fn load_account(storage: &dyn SnapshotStore, id: &str) -> Result<Account> {
    storage
        .get_account(&Id::from_string(id))
        .await?
        .with_context(|| format!("Account not found: {id}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ResolvedConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;

    let storage = Arc::new(JsonFileStorage::new(&config.data_dir));
    let service = ReportService::new(storage.clone());
    let now = SystemClock.now();

    match cli.command {
        Command::Config => {
            println!("Config file: {}", cli.config.display());
            println!("Data directory: {}", config.data_dir.display());
            println!("Default timeframe: {}", config.default_timeframe);
        }
        Command::Accounts => {
            for account in storage.list_accounts().await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    account.id,
                    account.acct,
                    account.timezone,
                    if account.active { "active" } else { "inactive" }
                );
            }
        }
        Command::Kpi { account, metric } => {
            let account = load_account(storage.as_ref(), &account).await?;
            let report = service.kpi_report(&account, metric, now).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Chart {
            account,
            metric,
            timeframe,
        } => {
            let account = load_account(storage.as_ref(), &account).await?;
            let timeframe = timeframe
                .as_deref()
                .map(|t| Timeframe::parse_or_default(Some(t)))
                .unwrap_or(config.default_timeframe);
            let points = service.chart(&account, metric, timeframe, now).await?;
            println!("{}", serde_json::to_string_pretty(&points)?);
        }
        Command::Export {
            account,
            metric,
            timeframe,
            out,
        } => {
            let account = load_account(storage.as_ref(), &account).await?;
            let timeframe = timeframe
                .as_deref()
                .map(|t| Timeframe::parse_or_default(Some(t)))
                .unwrap_or(config.default_timeframe);
            let export = service.csv_export(&account, metric, timeframe, now).await?;
            let path = out.unwrap_or_else(|| PathBuf::from(&export.filename));
            std::fs::write(&path, &export.content)
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
