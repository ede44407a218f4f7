//! Contribution calendar forecaster
//!
//! Loads a calendar snapshot, trains the requested pipeline and prints the
//! forecast as JSON on stdout. Logs go to stderr, filtered by `RUST_LOG`.

use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use contrib_forecast::{
    run_forecast, ContributionCalendar, ForecastConfig, ForecastContext, ForecastRequest,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "contrib-forecast")]
#[command(about = "Forecast activity from a daily contribution calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Calendar snapshot (GraphQL JSON, or CSV by extension)
    #[arg(long)]
    calendar: PathBuf,

    /// Optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Forecast as of this date instead of the local date (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Days until the next active day
    Next,
    /// Total of the week containing a date
    Week {
        /// Any date in the week (YYYY-MM-DD)
        date: NaiveDate,
    },
    /// Total of a month
    Month {
        /// Month number, 1 to 12
        month: u32,
    },
    /// Total of the current year
    Year,
    /// Run every pipeline for the current date
    All,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ForecastConfig::load(path)?,
        None => ForecastConfig::default(),
    };
    let calendar = ContributionCalendar::from_path(&cli.calendar)?;
    let context = cli
        .today
        .map(ForecastContext::new)
        .unwrap_or_default();

    tracing::info!(
        days = calendar.len(),
        today = %context.today,
        "Loaded calendar {}",
        cli.calendar.display()
    );

    let output = match cli.command {
        Commands::Next => single(&calendar, ForecastRequest::NextGap, &config, context)?,
        Commands::Week { date } => {
            single(&calendar, ForecastRequest::Week(date), &config, context)?
        }
        Commands::Month { month } => {
            single(&calendar, ForecastRequest::Month(month), &config, context)?
        }
        Commands::Year => single(&calendar, ForecastRequest::Year, &config, context)?,
        Commands::All => {
            let today = context.today;
            let run = |request: ForecastRequest| run_forecast(&calendar, request, &config, context);
            serde_json::json!({
                "nextGap": run(ForecastRequest::NextGap),
                "week": run(ForecastRequest::Week(today)),
                "month": run(ForecastRequest::Month(today.month())),
                "year": run(ForecastRequest::Year),
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn single(
    calendar: &ContributionCalendar,
    request: ForecastRequest,
    config: &ForecastConfig,
    context: ForecastContext,
) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::to_value(run_forecast(calendar, request, config, context))?)
}
