//! Background task scheduler for the daily reminder scan
//!
//! Enabled by default and configured via environment variables:
//!
//! - `FINTRACK_REMINDERS`: set to `off` to disable the scan
//! - `FINTRACK_REMINDER_HOUR`: UTC hour to run at (default: 3)
//! - `FINTRACK_REMINDER_WINDOW_DAYS`: days ahead to look for due items (default: 7)
//!
//! The scan only logs what it finds; nothing is persisted.

use std::time::Duration;

use chrono::{DateTime, Days, NaiveTime, Utc};
use tracing::{error, info, warn};

use fintrack_core::reminders::DEFAULT_WINDOW_DAYS;
use fintrack_core::Database;

/// UTC hour the scan runs at when `FINTRACK_REMINDER_HOUR` is unset
pub const DEFAULT_REMINDER_HOUR: u32 = 3;

/// Configuration for the reminder scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderScheduleConfig {
    /// UTC hour of day (0-23)
    pub hour: u32,
    /// Days ahead of today to include
    pub window_days: u32,
}

impl Default for ReminderScheduleConfig {
    fn default() -> Self {
        Self {
            hour: DEFAULT_REMINDER_HOUR,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl ReminderScheduleConfig {
    /// Parse configuration from environment variables
    ///
    /// Returns None if reminders are switched off (FINTRACK_REMINDERS=off)
    pub fn from_env() -> Option<Self> {
        if let Ok(flag) = std::env::var("FINTRACK_REMINDERS") {
            if matches!(flag.trim().to_lowercase().as_str(), "off" | "0" | "false" | "no") {
                info!("FINTRACK_REMINDERS is off, reminder scan disabled");
                return None;
            }
        }

        let mut config = Self::default();

        if let Ok(raw) = std::env::var("FINTRACK_REMINDER_HOUR") {
            match raw.trim().parse::<u32>() {
                Ok(hour) if hour < 24 => config.hour = hour,
                _ => warn!(value = %raw, "Invalid FINTRACK_REMINDER_HOUR, using {}", DEFAULT_REMINDER_HOUR),
            }
        }

        if let Ok(raw) = std::env::var("FINTRACK_REMINDER_WINDOW_DAYS") {
            match raw.trim().parse::<u32>() {
                Ok(days) => config.window_days = days,
                Err(_) => warn!(value = %raw, "Invalid FINTRACK_REMINDER_WINDOW_DAYS, using {}", DEFAULT_WINDOW_DAYS),
            }
        }

        Some(config)
    }
}

/// Time from `now` until the next occurrence of `hour`:00 UTC.
/// An exact match schedules the following day.
pub fn delay_until_next_run(now: DateTime<Utc>, hour: u32) -> Duration {
    let at = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let today_run = now.date_naive().and_time(at).and_utc();

    let next = if today_run > now {
        today_run
    } else {
        now.date_naive()
            .checked_add_days(Days::new(1))
            .map(|d| d.and_time(at).and_utc())
            .unwrap_or(today_run)
    };

    (next - now).to_std().unwrap_or(Duration::ZERO)
}

/// Start the reminder scan as a background task
///
/// Spawns a tokio task that sleeps until the configured hour and then scans
/// once a day.
pub fn start_reminder_scheduler(db: Database, config: ReminderScheduleConfig) {
    info!(
        "Starting reminder scheduler: daily at {:02}:00 UTC, {} day window",
        config.hour, config.window_days
    );

    tokio::spawn(async move {
        loop {
            tokio::time::sleep(delay_until_next_run(Utc::now(), config.hour)).await;

            let db = db.clone();
            let window_days = config.window_days;
            let scan = tokio::task::spawn_blocking(move || {
                db.scan_reminders(Utc::now().date_naive(), window_days)
            })
            .await;

            match scan {
                Ok(Ok(found)) => info!(due = found.total(), "Scheduled reminder scan completed"),
                Ok(Err(e)) => error!("Scheduled reminder scan failed: {}", e),
                Err(e) => error!("Reminder scan task panicked: {}", e),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_delay_until_next_run() {
        let before = Utc.with_ymd_and_hms(2024, 3, 10, 1, 30, 0).unwrap();
        assert_eq!(
            delay_until_next_run(before, 3),
            Duration::from_secs(90 * 60)
        );

        let after = Utc.with_ymd_and_hms(2024, 3, 10, 4, 0, 0).unwrap();
        assert_eq!(
            delay_until_next_run(after, 3),
            Duration::from_secs(23 * 3600)
        );

        // Exactly on the hour waits a full day
        let exact = Utc.with_ymd_and_hms(2024, 3, 10, 3, 0, 0).unwrap();
        assert_eq!(
            delay_until_next_run(exact, 3),
            Duration::from_secs(24 * 3600)
        );
    }

    #[test]
    fn test_delay_crosses_year_end() {
        let late = Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap();
        assert_eq!(delay_until_next_run(late, 0), Duration::from_secs(3600));
    }

    // Env vars are process-wide, so all env cases live in one test
    #[test]
    fn test_config_from_env() {
        std::env::remove_var("FINTRACK_REMINDERS");
        std::env::remove_var("FINTRACK_REMINDER_HOUR");
        std::env::remove_var("FINTRACK_REMINDER_WINDOW_DAYS");
        assert_eq!(
            ReminderScheduleConfig::from_env(),
            Some(ReminderScheduleConfig::default())
        );

        std::env::set_var("FINTRACK_REMINDER_HOUR", "18");
        std::env::set_var("FINTRACK_REMINDER_WINDOW_DAYS", "14");
        assert_eq!(
            ReminderScheduleConfig::from_env(),
            Some(ReminderScheduleConfig {
                hour: 18,
                window_days: 14
            })
        );

        std::env::set_var("FINTRACK_REMINDER_HOUR", "25");
        assert_eq!(
            ReminderScheduleConfig::from_env().map(|c| c.hour),
            Some(DEFAULT_REMINDER_HOUR)
        );

        std::env::set_var("FINTRACK_REMINDERS", "off");
        assert!(ReminderScheduleConfig::from_env().is_none());

        std::env::remove_var("FINTRACK_REMINDERS");
        std::env::remove_var("FINTRACK_REMINDER_HOUR");
        std::env::remove_var("FINTRACK_REMINDER_WINDOW_DAYS");
    }
}
