//! Month grid: the day cells of one visible month.
//!
//! Weeks start on Sunday. The month is padded with blank cells to whole
//! weeks, so a grid has four to six rows.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::date_range::DateRange;
use crate::error::{CalendarError, CalendarResult};

pub const DAYS_PER_WEEK: usize = 7;

/// One position of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "date", rename_all = "lowercase")]
pub enum GridCell {
    /// Padding before the 1st or after the last day of the month
    Blank,
    Day(NaiveDate),
}

impl GridCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            GridCell::Blank => None,
            GridCell::Day(d) => Some(*d),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    year: i32,
    month: u32,
    cells: Vec<GridCell>,
}

impl MonthGrid {
    pub fn new(year: i32, month: u32) -> CalendarResult<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            CalendarError::Config(format!("Invalid month {year}-{month:02}"))
        })?;
        Ok(Self::containing(first))
    }

    /// The grid of the month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let first = first_of_month(date);
        let leading = first.weekday().num_days_from_sunday() as usize;
        let days = days_in_month(first);

        let mut cells = Vec::with_capacity(42);
        cells.extend(std::iter::repeat_n(GridCell::Blank, leading));
        cells.extend((0..days).map(|offset| GridCell::Day(first + Duration::days(offset))));
        let trailing = (DAYS_PER_WEEK - cells.len() % DAYS_PER_WEEK) % DAYS_PER_WEEK;
        cells.extend(std::iter::repeat_n(GridCell::Blank, trailing));

        MonthGrid {
            year: first.year(),
            month: first.month(),
            cells,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Rows of seven cells, Sunday first.
    pub fn weeks(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    pub fn row_count(&self) -> usize {
        self.cells.len() / DAYS_PER_WEEK
    }

    pub fn first_day(&self) -> NaiveDate {
        self.cells
            .iter()
            .find_map(GridCell::date)
            .unwrap_or_default()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.cells
            .iter()
            .rev()
            .find_map(GridCell::date)
            .unwrap_or_default()
    }

    /// The month's dates as a fetch window.
    pub fn window(&self) -> DateRange {
        DateRange::new(self.first_day(), self.last_day())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Row and column (0 = Sunday) of a date in this grid.
    pub fn position_of(&self, date: NaiveDate) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|cell| cell.date() == Some(date))
            .map(|index| (index / DAYS_PER_WEEK, index % DAYS_PER_WEEK))
    }

    pub fn next(&self) -> Self {
        Self::containing(self.last_day() + Duration::days(1))
    }

    pub fn previous(&self) -> Self {
        Self::containing(self.first_day() - Duration::days(1))
    }

    /// e.g. "March 2024"
    pub fn title(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn days_in_month(first: NaiveDate) -> i64 {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next.map(|n| (n - first).num_days()).unwrap_or(31)
}
