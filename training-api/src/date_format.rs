//! Day-month-year text format used for every date crossing the API boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::TrainingError;

pub const DATE_FORMAT: &str = "%d-%m-%Y";
pub const DATE_PATTERN: &str = "DD-MM-YYYY";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> Result<NaiveDate, TrainingError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        TrainingError::InvalidFormat {
            value: value.to_string(),
            expected: DATE_PATTERN,
        }
    })
}

/// Blank strings count as "no date".
pub fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, TrainingError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_date(v).map(Some),
    }
}

/// `#[serde(with = "crate::date_format::option")]` for `Option<NaiveDate>` fields.
pub mod option {
    use super::*;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_some(&format_date(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        parse_optional_date(raw.as_deref()).map_err(serde::de::Error::custom)
    }
}
