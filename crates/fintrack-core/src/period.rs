//! Calendar arithmetic for summary periods
//!
//! A period is an inclusive `[start, end]` range of calendar days. Weeks run
//! Monday through Sunday, months from the 1st to the last day, years from
//! January 1 to December 31. No timezone conversion happens here.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::Granularity;

/// Inclusive date range of one summary bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Compute the bucket of `granularity` that contains `target`.
///
/// Fails with `InvalidData` only when the bucket boundary falls outside the
/// range chrono can represent.
pub fn calculate_period(target: NaiveDate, granularity: Granularity) -> Result<Period> {
    let out_of_range = || {
        Error::InvalidData(format!(
            "{} period for {} is outside the supported date range",
            granularity, target
        ))
    };

    let period = match granularity {
        Granularity::Weekly => {
            let back = u64::from(target.weekday().num_days_from_monday());
            let start = target
                .checked_sub_days(Days::new(back))
                .ok_or_else(out_of_range)?;
            let end = start
                .checked_add_days(Days::new(6))
                .ok_or_else(out_of_range)?;
            Period { start, end }
        }
        Granularity::Monthly => {
            let start = NaiveDate::from_ymd_opt(target.year(), target.month(), 1)
                .ok_or_else(out_of_range)?;
            let end = start
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
                .ok_or_else(out_of_range)?;
            Period { start, end }
        }
        Granularity::Yearly => {
            let start = NaiveDate::from_ymd_opt(target.year(), 1, 1).ok_or_else(out_of_range)?;
            let end = NaiveDate::from_ymd_opt(target.year(), 12, 31).ok_or_else(out_of_range)?;
            Period { start, end }
        }
    };

    Ok(period)
}

/// Resolve a user-supplied target date for a granularity.
///
/// Weekly takes `YYYY-MM-DD`. Monthly takes `YYYY-MM` or a full date. Yearly
/// takes `YYYY` or a full date. A missing or blank value resolves to `today`.
pub fn parse_target_date(
    raw: Option<&str>,
    granularity: Granularity,
    today: NaiveDate,
) -> Result<NaiveDate> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(today),
        Some(s) => s,
    };

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    let parsed = match granularity {
        Granularity::Weekly => None,
        Granularity::Monthly => NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d").ok(),
        Granularity::Yearly => raw
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1)),
    };

    parsed.ok_or_else(|| {
        let expected = match granularity {
            Granularity::Weekly => "YYYY-MM-DD",
            Granularity::Monthly => "YYYY-MM",
            Granularity::Yearly => "YYYY",
        };
        Error::InvalidData(format!(
            "Invalid date '{}' for {} summary (expected {})",
            raw, granularity, expected
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_weekly_mid_week() {
        let p = calculate_period(d("2023-11-15"), Granularity::Weekly).unwrap();
        assert_eq!(p.start, d("2023-11-13"));
        assert_eq!(p.end, d("2023-11-19"));
    }

    #[test]
    fn test_weekly_sunday_belongs_to_preceding_monday() {
        let p = calculate_period(d("2023-11-19"), Granularity::Weekly).unwrap();
        assert_eq!(p.start, d("2023-11-13"));
        assert_eq!(p.end, d("2023-11-19"));
    }

    #[test]
    fn test_weekly_monday_starts_its_own_week() {
        let p = calculate_period(d("2023-11-20"), Granularity::Weekly).unwrap();
        assert_eq!(p.start, d("2023-11-20"));
        assert_eq!(p.end, d("2023-11-26"));
    }

    #[test]
    fn test_weekly_crosses_year_boundary() {
        let p = calculate_period(d("2025-01-01"), Granularity::Weekly).unwrap();
        assert_eq!(p.start, d("2024-12-30"));
        assert_eq!(p.end, d("2025-01-05"));
    }

    #[test]
    fn test_monthly_lengths() {
        let feb_2023 = calculate_period(d("2023-02-14"), Granularity::Monthly).unwrap();
        assert_eq!(feb_2023.start, d("2023-02-01"));
        assert_eq!(feb_2023.end, d("2023-02-28"));

        let feb_2024 = calculate_period(d("2024-02-14"), Granularity::Monthly).unwrap();
        assert_eq!(feb_2024.end, d("2024-02-29"));

        let jan = calculate_period(d("2023-01-31"), Granularity::Monthly).unwrap();
        assert_eq!(jan.end, d("2023-01-31"));

        let apr = calculate_period(d("2023-04-10"), Granularity::Monthly).unwrap();
        assert_eq!(apr.start, d("2023-04-01"));
        assert_eq!(apr.end, d("2023-04-30"));

        let dec = calculate_period(d("2023-12-05"), Granularity::Monthly).unwrap();
        assert_eq!(dec.end, d("2023-12-31"));
    }

    #[test]
    fn test_yearly() {
        let p = calculate_period(d("2024-07-04"), Granularity::Yearly).unwrap();
        assert_eq!(p.start, d("2024-01-01"));
        assert_eq!(p.end, d("2024-12-31"));
    }

    #[test]
    fn test_period_contains_target_and_is_idempotent() {
        let mut date = d("2023-12-20");
        let last = d("2024-03-10");
        while date <= last {
            for g in Granularity::ALL {
                let p = calculate_period(date, g).unwrap();
                assert!(p.start <= p.end);
                assert!(p.contains(date), "{} not in {:?} ({})", date, p, g);
                assert_eq!(calculate_period(p.start, g).unwrap(), p);
                assert_eq!(calculate_period(date, g).unwrap(), p);
            }
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_out_of_range_is_an_error() {
        let result = calculate_period(NaiveDate::MAX, Granularity::Monthly);
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_parse_target_date_formats() {
        let today = d("2024-05-05");

        assert_eq!(
            parse_target_date(Some("2023-11-15"), Granularity::Weekly, today).unwrap(),
            d("2023-11-15")
        );
        assert_eq!(
            parse_target_date(Some("2023-04"), Granularity::Monthly, today).unwrap(),
            d("2023-04-01")
        );
        assert_eq!(
            parse_target_date(Some("2023-04-18"), Granularity::Monthly, today).unwrap(),
            d("2023-04-18")
        );
        assert_eq!(
            parse_target_date(Some("2022"), Granularity::Yearly, today).unwrap(),
            d("2022-01-01")
        );
        assert_eq!(
            parse_target_date(None, Granularity::Yearly, today).unwrap(),
            today
        );
        assert_eq!(
            parse_target_date(Some("  "), Granularity::Weekly, today).unwrap(),
            today
        );
    }

    #[test]
    fn test_parse_target_date_rejects_garbage() {
        let today = d("2024-05-05");
        assert!(matches!(
            parse_target_date(Some("2023-11"), Granularity::Weekly, today),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            parse_target_date(Some("2023-13"), Granularity::Monthly, today),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            parse_target_date(Some("last year"), Granularity::Yearly, today),
            Err(Error::InvalidData(_))
        ));
    }
}
