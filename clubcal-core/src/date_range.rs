//! Inclusive date window for fetching events.

use std::fmt;

use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;

/// Days shown by default when no end is given.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Date range for filtering events, inclusive at both ends.
/// None values mean unbounded in that direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Default for DateRange {
    /// Default range: today through DEFAULT_WINDOW_DAYS ahead
    fn default() -> Self {
        let today = Local::now().date_naive();
        DateRange {
            from: Some(today),
            to: Some(today + Duration::days(DEFAULT_WINDOW_DAYS)),
        }
    }
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        DateRange {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Parse command-line bounds.
    /// - `from`: "start" for unbounded, or YYYY-MM-DD; defaults to today
    /// - `to`: YYYY-MM-DD, defaults to DEFAULT_WINDOW_DAYS after `from`
    pub fn from_args(from: Option<&str>, to: Option<&str>) -> Result<Self, String> {
        let today = Local::now().date_naive();

        let from_date = match from {
            Some("start") => None,
            Some(s) => Some(parse_date(s)?),
            None => Some(today),
        };

        let to_date = match to {
            Some(s) => Some(parse_date(s)?),
            None => Some(from_date.unwrap_or(today) + Duration::days(DEFAULT_WINDOW_DAYS)),
        };

        if let (Some(f), Some(t)) = (from_date, to_date) {
            if t < f {
                return Err(format!("End date {t} is before start date {f}"));
            }
        }

        Ok(DateRange {
            from: from_date,
            to: to_date,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Whether the inclusive span `[start, end]` touches this range.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.from.is_none_or(|from| end >= from) && self.to.is_none_or(|to| start <= to)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let from = self.from.map(|d| d.to_string()).unwrap_or_else(|| "…".into());
        let to = self.to.map(|d| d.to_string()).unwrap_or_else(|| "…".into());
        write!(f, "{from} – {to}")
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}
