use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::RangeError;

/// Ten years, the widest window a single request may cover.
pub const DEFAULT_MAX_WINDOW_DAYS: i64 = 365 * 10;

/// Inclusive calendar range for a series request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

fn parse(raw: &str) -> Result<NaiveDate, RangeError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| RangeError::InvalidDate(raw.to_string()))
}

fn start_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

impl DateRange {
    /// Resolve optional request bounds into a concrete range.
    ///
    /// With no bounds the range is year to date. A missing end defaults to
    /// `today`; a missing start defaults to January 1st of the end's year.
    pub fn resolve(
        from: Option<&str>,
        to: Option<&str>,
        today: NaiveDate,
        max_window_days: i64,
    ) -> Result<Self, RangeError> {
        let to = match to {
            Some(raw) => parse(raw)?,
            None => today,
        };
        let from = match from {
            Some(raw) => parse(raw)?,
            None => start_of_year(to),
        };

        if from > to {
            return Err(RangeError::InvalidRange {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        let days = (to - from).num_days();
        if days > max_window_days {
            return Err(RangeError::WindowTooLarge {
                days,
                max_days: max_window_days,
            });
        }

        Ok(Self { from, to })
    }

    /// Whether `date` falls inside the range, both ends inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}
