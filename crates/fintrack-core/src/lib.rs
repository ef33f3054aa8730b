//! Fintrack Core Library
//!
//! Shared functionality for the Fintrack personal finance backend:
//! - Database access and migrations
//! - Period calculator for weekly, monthly and yearly buckets
//! - Summary cache with get-or-create and date-based invalidation
//! - Spending analytics and CSV/PDF reports
//! - Due-date reminder scan
//! - Pluggable AI advice backends

pub mod advice;
pub mod db;
pub mod error;
pub mod models;
pub mod period;
pub mod reminders;
pub mod report;
pub mod summary;

/// Test utilities including mock OpenRouter server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advice::{AdviceBackend, AdviceClient, MockAdviceBackend, OpenRouterBackend};
pub use db::Database;
pub use error::{Error, Result};
pub use models::{Granularity, SummaryView, TransactionKind};
pub use period::{calculate_period, parse_target_date, Period};
pub use report::{report_filename, ReportFormat};
