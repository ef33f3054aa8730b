//! CLI command tests

use chrono::NaiveDate;
use clap::Parser;
use fintrack_core::models::{NewTransaction, SummaryView};
use fintrack_core::{Database, Granularity, TransactionKind};
use tempfile::TempDir;

use crate::cli::{AnalyticsAction, Cli, Commands, ReportType};
use crate::commands;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

fn add(db: &Database, kind: TransactionKind, amount: f64, category: &str, date: &str) {
    db.create_transaction(
        kind,
        &NewTransaction {
            amount,
            category: category.to_string(),
            date: d(date),
            note: None,
        },
    )
    .unwrap();
}

// ========== Core ==========

#[test]
fn test_cmd_init_creates_database() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fintrack.db");

    commands::cmd_init(&path).unwrap();
    assert!(path.exists());

    // Re-opening an initialized database is fine
    let db = commands::open_db(&path).unwrap();
    assert!(db.list_cached_summaries().unwrap().is_empty());
}

#[test]
fn test_parse_date() {
    assert_eq!(commands::parse_date("2024-02-29", "--from").unwrap(), d("2024-02-29"));
    let err = commands::parse_date("2024-02-30", "--from").unwrap_err();
    assert!(err.to_string().contains("--from"));
}

// ========== Summary ==========

#[test]
fn test_cmd_summary_caches_overall() {
    let db = setup_test_db();
    add(&db, TransactionKind::Income, 1500.0, "Salary", "2023-04-03");
    add(&db, TransactionKind::Expense, 500.0, "Rent", "2023-04-04");

    commands::cmd_summary(&db, "monthly", Some("2023-04"), None, false).unwrap();

    let cached = db.list_cached_summaries().unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].granularity, Granularity::Monthly);
    assert_eq!(cached[0].period_start, d("2023-04-01"));
    assert_eq!(cached[0].net_balance, 1000.0);
}

#[test]
fn test_cmd_summary_views_and_json() {
    let db = setup_test_db();
    add(&db, TransactionKind::Expense, 25.0, "Food", "2024-06-10");

    commands::cmd_summary(&db, "weekly", Some("2024-06-10"), Some("expenses"), true).unwrap();
    commands::cmd_summary(&db, "yearly", Some("2024"), Some("income"), false).unwrap();

    // Only the overall view is cached
    assert!(db.list_cached_summaries().unwrap().is_empty());
    assert_eq!("expenses".parse::<SummaryView>().unwrap(), SummaryView::Expenses);
}

#[test]
fn test_cmd_summary_errors() {
    let db = setup_test_db();

    assert!(commands::cmd_summary(&db, "daily", None, None, false).is_err());
    assert!(commands::cmd_summary(&db, "monthly", None, Some("bogus"), false).is_err());
    assert!(commands::cmd_summary(&db, "monthly", None, Some("savings"), false).is_err());
    assert!(commands::cmd_summary(&db, "weekly", Some("2024-06"), None, false).is_err());
}

// ========== Invalidate ==========

#[test]
fn test_cmd_invalidate_selected_granularity() {
    let db = setup_test_db();
    add(&db, TransactionKind::Income, 100.0, "Gift", "2023-11-15");
    for g in Granularity::ALL {
        db.get_or_create_summary(g, d("2023-11-15"), SummaryView::Overall)
            .unwrap();
    }

    commands::cmd_invalidate(&db, "2023-11-15", &["monthly".to_string()]).unwrap();

    let remaining: Vec<Granularity> = db
        .list_cached_summaries()
        .unwrap()
        .into_iter()
        .map(|s| s.granularity)
        .collect();
    assert_eq!(remaining.len(), 2);
    assert!(!remaining.contains(&Granularity::Monthly));
}

#[test]
fn test_cmd_invalidate_all_by_default() {
    let db = setup_test_db();
    for g in Granularity::ALL {
        db.get_or_create_summary(g, d("2023-11-15"), SummaryView::Overall)
            .unwrap();
    }

    commands::cmd_invalidate(&db, "2023-11-19", &[]).unwrap();
    assert!(db.list_cached_summaries().unwrap().is_empty());

    // Nothing left to delete is still a success
    commands::cmd_invalidate(&db, "2023-11-19", &[]).unwrap();
}

#[test]
fn test_cmd_invalidate_rejects_bad_input() {
    let db = setup_test_db();
    assert!(commands::cmd_invalidate(&db, "15/11/2023", &[]).is_err());
    assert!(commands::cmd_invalidate(&db, "2023-11-15", &["hourly".to_string()]).is_err());
}

// ========== Reminders ==========

#[test]
fn test_cmd_reminders_empty() {
    let db = setup_test_db();
    assert!(commands::cmd_reminders(&db, 7).is_ok());
}

// ========== Report ==========

#[test]
fn test_cmd_report_csv_to_file() {
    let db = setup_test_db();
    add(&db, TransactionKind::Income, 1200.0, "Salary", "2024-01-31");
    add(&db, TransactionKind::Expense, 9.99, "Streaming", "2024-01-15");
    add(&db, TransactionKind::Expense, 60.0, "Fuel", "2024-02-01");

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("report.csv");
    commands::cmd_report_csv(&db, "2024-01-01", "2024-01-31", Some(&out)).unwrap();

    let csv = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Type,Date,Category,Amount,Note",
            "Income,2024-01-31,Salary,1200.00,",
            "Expense,2024-01-15,Streaming,9.99,",
        ]
    );
}

#[test]
fn test_cmd_report_csv_rejects_reversed_range() {
    let db = setup_test_db();
    let result = commands::cmd_report_csv(&db, "2024-02-01", "2024-01-01", None);
    assert!(result.is_err());
}

#[test]
fn test_cmd_report_pdf_to_file() {
    let db = setup_test_db();
    add(&db, TransactionKind::Income, 1200.0, "Salary", "2024-01-31");
    add(&db, TransactionKind::Expense, 9.99, "Streaming", "2024-01-15");

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("report.pdf");
    commands::cmd_report_pdf(&db, "2024-01-01", "2024-01-31", Some(&out)).unwrap();

    let pdf = std::fs::read(&out).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn test_cmd_report_pdf_rejects_reversed_range() {
    let db = setup_test_db();
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("report.pdf");

    let result = commands::cmd_report_pdf(&db, "2024-02-01", "2024-01-01", Some(&out));
    assert!(result.is_err());
    assert!(!out.exists());
}

// ========== Analytics ==========

#[test]
fn test_cmd_analytics() {
    let db = setup_test_db();
    add(&db, TransactionKind::Expense, 30.0, "Food", "2024-03-02");

    assert!(commands::cmd_analytics_categories(&db, Some("2024-03")).is_ok());
    assert!(commands::cmd_analytics_categories(&db, Some("March")).is_err());
    assert!(commands::cmd_analytics_trend(&db, 6).is_ok());
    assert!(commands::cmd_analytics_trend(&db, 0).is_err());
    assert!(commands::cmd_analytics_trend(&db, 120).is_ok());
    assert!(commands::cmd_analytics_trend(&db, 121).is_err());
}

// ========== Argument parsing ==========

#[test]
fn test_cli_parses_subcommands() {
    let cli = Cli::try_parse_from([
        "fintrack",
        "--db",
        "test.db",
        "invalidate",
        "--date",
        "2024-01-01",
        "-g",
        "weekly",
        "-g",
        "yearly",
    ])
    .unwrap();
    assert_eq!(cli.db.to_str(), Some("test.db"));
    match cli.command {
        Commands::Invalidate { date, granularity } => {
            assert_eq!(date, "2024-01-01");
            assert_eq!(granularity, vec!["weekly", "yearly"]);
        }
        _ => panic!("expected invalidate"),
    }

    let cli = Cli::try_parse_from([
        "fintrack", "report", "csv", "--from", "2024-01-01", "--to", "2024-01-31",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Report {
            report_type: ReportType::Csv { output: None, .. }
        }
    ));

    let cli = Cli::try_parse_from([
        "fintrack", "report", "pdf", "--from", "2024-01-01", "--to", "2024-01-31", "-o", "out.pdf",
    ])
    .unwrap();
    match cli.command {
        Commands::Report {
            report_type: ReportType::Pdf { from, to, output },
        } => {
            assert_eq!(from, "2024-01-01");
            assert_eq!(to, "2024-01-31");
            assert_eq!(output.as_deref(), Some(std::path::Path::new("out.pdf")));
        }
        _ => panic!("expected report pdf"),
    }

    let cli = Cli::try_parse_from(["fintrack", "analytics", "trend"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Analytics {
            action: AnalyticsAction::Trend { months: 6 }
        }
    ));
}
