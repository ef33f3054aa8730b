//! Fintrack CLI - Personal finance backend
//!
//! Usage:
//!   fintrack init                          Initialize database
//!   fintrack serve --port 8080             Start web server
//!   fintrack summary monthly --date 2024-03
//!   fintrack report csv --from 2024-01-01 --to 2024-03-31

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&cli.db, &host, port, static_dir.as_deref()).await,
        Commands::Summary {
            granularity,
            date,
            view,
            json,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_summary(&db, &granularity, date.as_deref(), view.as_deref(), json)
        }
        Commands::Invalidate { date, granularity } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_invalidate(&db, &date, &granularity)
        }
        Commands::Reminders { days } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_reminders(&db, days)
        }
        Commands::Report { report_type } => {
            let db = commands::open_db(&cli.db)?;
            match report_type {
                ReportType::Csv { from, to, output } => {
                    commands::cmd_report_csv(&db, &from, &to, output.as_deref())
                }
                ReportType::Pdf { from, to, output } => {
                    commands::cmd_report_pdf(&db, &from, &to, output.as_deref())
                }
            }
        }
        Commands::Analytics { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                AnalyticsAction::Categories { month } => {
                    commands::cmd_analytics_categories(&db, month.as_deref())
                }
                AnalyticsAction::Trend { months } => commands::cmd_analytics_trend(&db, months),
            }
        }
    }
}
