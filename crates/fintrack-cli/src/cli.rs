//! CLI argument definitions using clap
//!
//! The command implementations live in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fintrack - Track income, expenses, debts and savings goals
#[derive(Parser)]
#[command(name = "fintrack")]
#[command(about = "Self-hosted personal finance backend", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "fintrack.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on (PORT env var overrides the default)
        #[arg(short, long, env = "PORT", default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory of static frontend files to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Show the income/expense summary for a period
    Summary {
        /// weekly, monthly or yearly
        granularity: String,

        /// Target date: YYYY-MM-DD, YYYY-MM (monthly) or YYYY (yearly). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,

        /// overall, income or expenses
        #[arg(long)]
        view: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Drop cached summaries containing a date
    Invalidate {
        /// Date whose periods are invalidated (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Granularities to invalidate (repeatable; default: all)
        #[arg(short, long)]
        granularity: Vec<String>,
    },

    /// List pending debts and unmet savings goals coming due
    Reminders {
        /// Days ahead to look
        #[arg(long, default_value = "7")]
        days: u32,
    },

    /// Generate reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Spending analytics
    Analytics {
        #[command(subcommand)]
        action: AnalyticsAction,
    },
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Income and expense transactions as CSV
    Csv {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// Output file (stdout if not set)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Income and expense transactions as a PDF with totals
    Pdf {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// Output file (defaults to financial_report_<from>_to_<to>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AnalyticsAction {
    /// Expense totals by category for a month
    Categories {
        /// Month as YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
    },

    /// Monthly income vs expenses
    Trend {
        /// Number of months including the current one
        #[arg(long, default_value = "6")]
        months: u32,
    },
}
