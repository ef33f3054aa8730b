//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analytics` - Category breakdown and income/expense trend
//! - `core` - Init and shared utilities (open_db, parse_date)
//! - `invalidate` - Manual summary cache invalidation
//! - `reminders` - Due-date reminder scan
//! - `report` - CSV and PDF report generation
//! - `serve` - Web server command
//! - `summary` - Period summaries

pub mod analytics;
pub mod core;
pub mod invalidate;
pub mod reminders;
pub mod report;
pub mod serve;
pub mod summary;

// Re-export command functions for main.rs
pub use analytics::*;
pub use core::*;
pub use invalidate::*;
pub use reminders::*;
pub use report::*;
pub use serve::*;
pub use summary::*;
