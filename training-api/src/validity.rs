//! Training validity engine.
//!
//! Pure functions deriving an assignment's expiration date, renewal warning
//! and completion percentage from its start date, the sub-training's
//! validity period and the current date. Callers pass `today` explicitly.
//!
//! Completion uses a binary rule: a training is either still valid (100%)
//! or expired (0%). Permanent trainings and assignments without dates are
//! always 100%.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::TrainingError;

/// Days before expiration during which an assignment is flagged for renewal.
pub const WARNING_WINDOW_DAYS: i64 = 30;

/// Fixed validity durations a sub-training may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ValidityPeriod {
    #[serde(rename = "6 months")]
    SixMonths,
    #[serde(rename = "1 year")]
    OneYear,
    #[serde(rename = "2 years")]
    TwoYears,
    #[serde(rename = "3 years")]
    ThreeYears,
    #[serde(rename = "4 years")]
    FourYears,
    #[serde(rename = "5 years")]
    FiveYears,
    Permanent,
}

impl ValidityPeriod {
    pub const ALL: [ValidityPeriod; 7] = [
        ValidityPeriod::SixMonths,
        ValidityPeriod::OneYear,
        ValidityPeriod::TwoYears,
        ValidityPeriod::ThreeYears,
        ValidityPeriod::FourYears,
        ValidityPeriod::FiveYears,
        ValidityPeriod::Permanent,
    ];

    /// Length in days, `None` for permanent trainings.
    pub fn days(self) -> Option<i32> {
        match self {
            ValidityPeriod::SixMonths => Some(182),
            ValidityPeriod::OneYear => Some(365),
            ValidityPeriod::TwoYears => Some(730),
            ValidityPeriod::ThreeYears => Some(1095),
            ValidityPeriod::FourYears => Some(1460),
            ValidityPeriod::FiveYears => Some(1825),
            ValidityPeriod::Permanent => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ValidityPeriod::SixMonths => "6 months",
            ValidityPeriod::OneYear => "1 year",
            ValidityPeriod::TwoYears => "2 years",
            ValidityPeriod::ThreeYears => "3 years",
            ValidityPeriod::FourYears => "4 years",
            ValidityPeriod::FiveYears => "5 years",
            ValidityPeriod::Permanent => "Permanent",
        }
    }

    pub fn duration(self) -> Option<Duration> {
        self.days().map(|d| Duration::days(i64::from(d)))
    }

    /// Inverse of [`ValidityPeriod::days`], used when reading the
    /// `validity_days` column.
    pub fn from_days(days: Option<i32>) -> Result<Self, TrainingError> {
        Self::ALL
            .into_iter()
            .find(|p| p.days() == days)
            .ok_or_else(|| {
                TrainingError::validation(format!(
                    "{} days is not an allowed validity period",
                    days.unwrap_or_default()
                ))
            })
    }

    pub fn from_label(label: &str) -> Result<Self, TrainingError> {
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(label.trim()))
            .ok_or_else(|| {
                TrainingError::validation(format!("'{}' is not an allowed validity period", label))
            })
    }
}

/// Current calendar date on the server.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// `start + period`, or `None` when the start date is missing or the
/// training never expires.
pub fn expiration_date(start: Option<NaiveDate>, period: ValidityPeriod) -> Option<NaiveDate> {
    let start = start?;
    let length = period.duration()?;
    start.checked_add_signed(length)
}

/// True once `today` reaches the 30-day window before expiration
/// (inclusive), and for anything already expired.
pub fn is_warning(expiration: Option<NaiveDate>, today: NaiveDate) -> bool {
    match expiration {
        Some(exp) => exp - Duration::days(WARNING_WINDOW_DAYS) <= today,
        None => false,
    }
}

pub fn completion_percentage(
    start: Option<NaiveDate>,
    expiration: Option<NaiveDate>,
    period: ValidityPeriod,
    today: NaiveDate,
) -> f64 {
    match (period, start, expiration) {
        (ValidityPeriod::Permanent, _, _) | (_, None, _) | (_, _, None) => 100.0,
        (_, Some(_), Some(exp)) if today < exp => 100.0,
        _ => 0.0,
    }
}

/// Expiration and warning as they must be stored on every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Derived {
    pub expiration_date: Option<NaiveDate>,
    pub warning: bool,
}

pub fn derive(start: Option<NaiveDate>, period: ValidityPeriod, today: NaiveDate) -> Derived {
    let expiration_date = expiration_date(start, period);
    Derived {
        expiration_date,
        warning: is_warning(expiration_date, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_table() {
        let expected = [
            (ValidityPeriod::SixMonths, Some(182), "6 months"),
            (ValidityPeriod::OneYear, Some(365), "1 year"),
            (ValidityPeriod::TwoYears, Some(730), "2 years"),
            (ValidityPeriod::ThreeYears, Some(1095), "3 years"),
            (ValidityPeriod::FourYears, Some(1460), "4 years"),
            (ValidityPeriod::FiveYears, Some(1825), "5 years"),
            (ValidityPeriod::Permanent, None, "Permanent"),
        ];
        for (period, days, label) in expected {
            assert_eq!(period.days(), days);
            assert_eq!(period.label(), label);
            assert_eq!(ValidityPeriod::from_days(days).unwrap(), period);
            assert_eq!(ValidityPeriod::from_label(label).unwrap(), period);
        }
    }

    #[test]
    fn test_unknown_periods_rejected() {
        assert!(matches!(ValidityPeriod::from_days(Some(42)), Err(TrainingError::Validation(_))));
        assert!(matches!(ValidityPeriod::from_label("7 years"), Err(TrainingError::Validation(_))));
    }

    #[test]
    fn test_label_serialization() {
        assert_eq!(serde_json::to_string(&ValidityPeriod::SixMonths).unwrap(), "\"6 months\"");
        assert_eq!(serde_json::to_string(&ValidityPeriod::Permanent).unwrap(), "\"Permanent\"");
        let parsed: ValidityPeriod = serde_json::from_str("\"3 years\"").unwrap();
        assert_eq!(parsed, ValidityPeriod::ThreeYears);
    }

    #[test]
    fn test_expiration_date() {
        let start = date(2024, 1, 1);
        assert_eq!(expiration_date(Some(start), ValidityPeriod::SixMonths), Some(date(2024, 7, 1)));
        assert_eq!(expiration_date(Some(start), ValidityPeriod::OneYear), Some(date(2024, 12, 31)));
        assert_eq!(expiration_date(Some(start), ValidityPeriod::Permanent), None);
        assert_eq!(expiration_date(None, ValidityPeriod::TwoYears), None);

        for period in ValidityPeriod::ALL {
            let expected = period.days().map(|d| start + Duration::days(i64::from(d)));
            assert_eq!(expiration_date(Some(start), period), expected);
        }
    }

    #[test]
    fn test_warning_window_is_inclusive() {
        let today = date(2024, 6, 1);
        assert!(is_warning(Some(today + Duration::days(30)), today));
        assert!(!is_warning(Some(today + Duration::days(31)), today));
        assert!(is_warning(Some(today), today));
        assert!(is_warning(Some(today - Duration::days(10)), today));
        assert!(!is_warning(None, today));
    }

    #[test]
    fn test_completion_is_binary() {
        let start = Some(date(2024, 1, 1));
        let exp = expiration_date(start, ValidityPeriod::SixMonths);
        assert_eq!(completion_percentage(start, exp, ValidityPeriod::SixMonths, date(2024, 6, 30)), 100.0);
        assert_eq!(completion_percentage(start, exp, ValidityPeriod::SixMonths, date(2024, 7, 1)), 0.0);
        assert_eq!(completion_percentage(start, exp, ValidityPeriod::SixMonths, date(2024, 7, 2)), 0.0);
    }

    #[test]
    fn test_permanent_or_missing_dates_are_complete() {
        let far_future = date(2090, 1, 1);
        assert_eq!(completion_percentage(Some(date(2000, 1, 1)), None, ValidityPeriod::Permanent, far_future), 100.0);
        assert_eq!(completion_percentage(None, None, ValidityPeriod::OneYear, far_future), 100.0);
        assert_eq!(completion_percentage(Some(date(2000, 1, 1)), None, ValidityPeriod::OneYear, far_future), 100.0);
    }

    #[test]
    fn test_derive() {
        let today = date(2024, 6, 10);
        let derived = derive(Some(date(2024, 1, 1)), ValidityPeriod::SixMonths, today);
        assert_eq!(derived.expiration_date, Some(date(2024, 7, 1)));
        assert!(derived.warning);

        let derived = derive(Some(date(2024, 1, 1)), ValidityPeriod::Permanent, today);
        assert_eq!(derived, Derived { expiration_date: None, warning: false });
    }
}
