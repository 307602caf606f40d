//! Event types as handed over by the storage collaborator.
//!
//! Events are immutable inputs. All calendar logic compares them by local
//! calendar day, so the only time arithmetic here is date-only.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::entity::EntityRef;
use crate::error::CalendarError;

/// A calendar event owned by one club, zone or district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    pub visibility: Visibility,
    /// The entity this event is posted on behalf of
    pub owner: EntityRef,
    /// Display name of the owner, denormalized by the fetch
    pub owner_name: Option<String>,
}

impl Event {
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    /// True when the end lies before the start.
    pub fn is_malformed(&self) -> bool {
        match (&self.start, &self.end) {
            (EventTime::DateTime(start), EventTime::DateTime(end)) => end < start,
            _ => self.end_date() < self.start_date(),
        }
    }

    /// Starts and ends on the same calendar day.
    pub fn is_single_day(&self) -> bool {
        self.start_date() == self.end_date()
    }

    /// Number of calendar days touched, counting both ends.
    pub fn days_spanned(&self) -> i64 {
        (self.end_date() - self.start_date()).num_days() + 1
    }

    /// Whether the event touches `date`.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.start_date() <= date && date <= self.end_date()
    }

    /// Whether the event touches any day of the inclusive window.
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.start_date() <= to && self.end_date() >= from
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }

    /// Owner display name, falling back to the owner id.
    pub fn owner_display(&self) -> &str {
        self.owner_name.as_deref().unwrap_or(&self.owner.id)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_title())
    }
}

/// Start or end of an event in the caller's local calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    DateTime(NaiveDateTime),
    Date(NaiveDate),
}

impl EventTime {
    pub fn date(&self) -> NaiveDate {
        match self {
            EventTime::DateTime(dt) => dt.date(),
            EventTime::Date(d) => *d,
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    /// Sort key; all-day values sort at the start of their day.
    pub fn sort_key(&self) -> NaiveDateTime {
        match self {
            EventTime::DateTime(dt) => *dt,
            EventTime::Date(d) => d.and_time(chrono::NaiveTime::MIN),
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl FromStr for EventTime {
    type Err = CalendarError;

    /// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DDTHH:MM:SS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
            return Ok(EventTime::DateTime(dt));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
            return Ok(EventTime::DateTime(dt));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(EventTime::Date)
            .map_err(|_| {
                CalendarError::DataFile(format!(
                    "Invalid date '{s}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS]"
                ))
            })
    }
}

/// Who may see an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Internal,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Internal => "internal",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The visibility part of a filter selection.
///
/// `Private` selects every non-public event, i.e. both private and
/// internal ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityFilter {
    #[default]
    All,
    Public,
    #[serde(alias = "internal")]
    Private,
}

impl VisibilityFilter {
    pub fn allows(&self, visibility: Visibility) -> bool {
        match self {
            VisibilityFilter::All => true,
            VisibilityFilter::Public => visibility == Visibility::Public,
            VisibilityFilter::Private => visibility != Visibility::Public,
        }
    }

    /// The visibility classes this filter admits, None when unrestricted.
    pub fn classes(&self) -> Option<Vec<Visibility>> {
        match self {
            VisibilityFilter::All => None,
            VisibilityFilter::Public => Some(vec![Visibility::Public]),
            VisibilityFilter::Private => Some(vec![Visibility::Private, Visibility::Internal]),
        }
    }
}

impl FromStr for VisibilityFilter {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(VisibilityFilter::All),
            "public" => Ok(VisibilityFilter::Public),
            "private" | "internal" => Ok(VisibilityFilter::Private),
            other => Err(CalendarError::Config(format!(
                "Unknown visibility '{other}'. Expected all, public or private"
            ))),
        }
    }
}
