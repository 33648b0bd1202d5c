//! Canonical date handling for provider records.
//!
//! Treasury feeds are inconsistent about how they encode the observation date:
//! some return `YYYY-MM-DD`, some `YYYY-MM-DD HH:MM:SS`, and some a millisecond
//! epoch integer. Everything is normalized to a [`NaiveDate`] before keying.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::AnalysisError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a treasury date string, accepting a full timestamp before falling back
/// to a bare date.
pub fn parse_date_str(raw: &str) -> Result<NaiveDate, AnalysisError> {
    let trimmed = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT) {
        return Ok(dt.date());
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        AnalysisError::MalformedDate(format!(
            "treasury date '{}' is neither YYYY-MM-DD nor YYYY-MM-DD HH:MM:SS",
            raw
        ))
    })
}

/// Convert a millisecond epoch timestamp to its UTC calendar date.
pub fn date_from_millis(millis: i64) -> Result<NaiveDate, AnalysisError> {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| {
            AnalysisError::MalformedDate(format!("treasury timestamp {} is out of range", millis))
        })
}

/// Render a date in the canonical `YYYY-MM-DD` form.
pub fn canonical(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        let d = parse_date_str("2024-03-15").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn test_parse_datetime_drops_time() {
        let d = parse_date_str("2024-03-15 16:30:00").unwrap();
        assert_eq!(canonical(d), "2024-03-15");
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        let err = parse_date_str("15/03/2024").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedDate(_)));
    }

    #[test]
    fn test_millis_to_utc_date() {
        // 2024-01-02T00:00:00Z
        let d = date_from_millis(1_704_153_600_000).unwrap();
        assert_eq!(canonical(d), "2024-01-02");
    }
}
