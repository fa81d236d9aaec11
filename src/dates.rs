//! Calendar month arithmetic anchored to loan start dates
//!
//! Loan start dates are held as the first day of the start month. Elapsed
//! time is counted in whole calendar months; the day of month is ignored.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::{AdvisorError, Result};

/// Parse a `YYYY-MM` string into the first day of that month
pub fn parse_start_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| AdvisorError::InvalidStartMonth(s.to_string()))
}

/// Whole calendar months from `start` to `as_of` (negative if start is later)
pub fn months_elapsed(start: NaiveDate, as_of: NaiveDate) -> i32 {
    (as_of.year() - start.year()) * 12 + (as_of.month() as i32 - start.month() as i32)
}

/// Months left on the original tenure, floored at 0
pub fn remaining_tenure(original_tenure: u32, start: NaiveDate, as_of: NaiveDate) -> u32 {
    let remaining = original_tenure as i64 - months_elapsed(start, as_of) as i64;
    remaining.max(0) as u32
}

/// Fractional loan age in years, measured in 365-day years
pub fn loan_age_years(start: NaiveDate, as_of: NaiveDate) -> f64 {
    (as_of - start).num_days() as f64 / 365.0
}

/// Add whole months, clamping to the end of shorter months
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Short display label, e.g. "Mar 2026"
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Serde adapter storing a start date as `"YYYY-MM"`
pub mod year_month {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_start_month(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_start_month() {
        assert_eq!(parse_start_month("2020-01").unwrap(), ymd(2020, 1, 1));
        assert!(parse_start_month("2020-13").is_err());
        assert!(parse_start_month("Jan 2020").is_err());
    }

    #[test]
    fn test_months_elapsed_ignores_day() {
        assert_eq!(months_elapsed(ymd(2020, 1, 1), ymd(2026, 10, 19)), 81);
        assert_eq!(months_elapsed(ymd(2020, 11, 1), ymd(2021, 2, 1)), 3);
        assert_eq!(months_elapsed(ymd(2027, 1, 1), ymd(2026, 10, 1)), -3);
    }

    #[test]
    fn test_remaining_tenure_floors_at_zero() {
        assert_eq!(remaining_tenure(240, ymd(2020, 1, 1), ymd(2026, 10, 1)), 159);
        assert_eq!(remaining_tenure(12, ymd(2000, 1, 1), ymd(2026, 10, 1)), 0);
    }

    #[test]
    fn test_add_months_and_label() {
        let start = ymd(2026, 11, 1);
        assert_eq!(month_label(add_months(start, 0)), "Nov 2026");
        assert_eq!(month_label(add_months(start, 2)), "Jan 2027");
        assert_eq!(add_months(ymd(2026, 1, 31), 1), ymd(2026, 2, 28));
    }
}
