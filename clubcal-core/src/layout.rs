//! Month layout: day buckets for single-day events and spanning bars for
//! multi-day events.
//!
//! A multi-day event gets one bar per week row it touches. The bar starts at
//! the first covered cell of the row and runs to the end of the week or the
//! end of the event, whichever comes first. Bars are stacked by row only;
//! concurrent multi-day events in the same week share a vertical offset.

use chrono::NaiveDate;
use serde::Serialize;

use crate::event::Event;
use crate::grid::{DAYS_PER_WEEK, MonthGrid};

/// Single-day events listed per cell before the rest are counted as overflow.
pub const DEFAULT_MAX_EVENTS_PER_DAY: usize = 3;

/// Height of the weekday header above the first row, in pixels.
pub const HEADER_HEIGHT: f32 = 32.0;
/// Height of one week row, in pixels.
pub const ROW_HEIGHT: f32 = 120.0;
/// Space reserved for the day number at the top of a cell.
pub const DAY_NUMBER_HEIGHT: f32 = 24.0;

/// How an event is drawn on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSpan {
    SingleDay,
    MultiDay,
}

impl EventSpan {
    /// Classify by calendar day; None for events ending before they start.
    pub fn classify(event: &Event) -> Option<EventSpan> {
        if event.is_malformed() {
            None
        } else if event.is_single_day() {
            Some(EventSpan::SingleDay)
        } else {
            Some(EventSpan::MultiDay)
        }
    }
}

/// Events of one dated cell.
#[derive(Debug, Clone, Serialize)]
pub struct DayEvents<'a> {
    pub date: NaiveDate,
    pub row: usize,
    pub column: usize,
    /// Single-day events shown in the cell, earliest first
    pub single_day: Vec<&'a Event>,
    /// Single-day events that did not fit
    pub overflow: usize,
    /// Multi-day events covering this date
    pub multi_day: Vec<&'a Event>,
}

impl DayEvents<'_> {
    pub fn is_empty(&self) -> bool {
        self.single_day.is_empty() && self.overflow == 0 && self.multi_day.is_empty()
    }

    pub fn total(&self) -> usize {
        self.single_day.len() + self.overflow + self.multi_day.len()
    }
}

/// The part of a multi-day event drawn in one week row.
#[derive(Debug, Clone, Serialize)]
pub struct SpanSegment<'a> {
    pub event: &'a Event,
    pub row: usize,
    /// 0 = Sunday
    pub start_column: usize,
    /// Columns covered, 1..=7; 0 only for degenerate input
    pub span: usize,
    /// This segment holds the event's first day
    pub is_start_day: bool,
    /// This segment reaches the event's last day
    pub is_end_day: bool,
}

impl SpanSegment<'_> {
    /// Left edge as a fraction of the row width.
    pub fn left_fraction(&self) -> f32 {
        self.start_column as f32 / DAYS_PER_WEEK as f32
    }

    /// Width as a fraction of the row width.
    pub fn width_fraction(&self) -> f32 {
        self.span as f32 / DAYS_PER_WEEK as f32
    }

    /// Distance from the top of the grid, in pixels.
    pub fn top_offset(&self) -> f32 {
        HEADER_HEIGHT + self.row as f32 * ROW_HEIGHT + DAY_NUMBER_HEIGHT
    }

    /// Titles are drawn once, on the segment holding the first day.
    pub fn shows_label(&self) -> bool {
        self.is_start_day
    }
}

/// Everything needed to draw one month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthLayout<'a> {
    /// One entry per dated cell, in grid order
    pub days: Vec<DayEvents<'a>>,
    pub segments: Vec<SpanSegment<'a>>,
    /// Events left out because their dates are unusable
    pub skipped: Vec<&'a Event>,
}

impl<'a> MonthLayout<'a> {
    /// Lay `events` out on `grid`, listing at most `max_per_day` single-day
    /// events per cell.
    pub fn build(grid: &MonthGrid, events: &'a [Event], max_per_day: usize) -> Self {
        let mut single = Vec::new();
        let mut multi = Vec::new();
        let mut skipped = Vec::new();

        for event in events {
            match EventSpan::classify(event) {
                Some(EventSpan::SingleDay) => single.push(event),
                Some(EventSpan::MultiDay) => multi.push(event),
                None => {
                    tracing::warn!(
                        event_id = %event.id,
                        start = %event.start,
                        end = %event.end,
                        "skipping event that ends before it starts"
                    );
                    skipped.push(event);
                }
            }
        }

        single.sort_by_key(|e| e.start.sort_key());
        multi.sort_by_key(|e| e.start.sort_key());

        let days = bucket_days(grid, &single, &multi, max_per_day);
        let segments = multi
            .iter()
            .flat_map(|&event| span_segments(grid, event))
            .collect();

        MonthLayout {
            days,
            segments,
            skipped,
        }
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayEvents<'a>> {
        self.days.iter().find(|d| d.date == date)
    }

    pub fn segments_in_row(&self, row: usize) -> impl Iterator<Item = &SpanSegment<'a>> {
        self.segments.iter().filter(move |s| s.row == row)
    }

    pub fn segments_for(&self, event_id: &str) -> impl Iterator<Item = &SpanSegment<'a>> {
        self.segments.iter().filter(move |s| s.event.id == event_id)
    }
}

fn bucket_days<'a>(
    grid: &MonthGrid,
    single: &[&'a Event],
    multi: &[&'a Event],
    max_per_day: usize,
) -> Vec<DayEvents<'a>> {
    grid.cells()
        .iter()
        .enumerate()
        .filter_map(|(index, cell)| Some((index, cell.date()?)))
        .map(|(index, date)| {
            let on_day: Vec<&Event> = single
                .iter()
                .copied()
                .filter(|e| e.start_date() == date)
                .collect();
            let overflow = on_day.len().saturating_sub(max_per_day);

            DayEvents {
                date,
                row: index / DAYS_PER_WEEK,
                column: index % DAYS_PER_WEEK,
                single_day: on_day.into_iter().take(max_per_day).collect(),
                overflow,
                multi_day: multi.iter().copied().filter(|e| e.occurs_on(date)).collect(),
            }
        })
        .collect()
}

/// One segment per week row in which `event` covers at least one dated cell.
fn span_segments<'a>(grid: &MonthGrid, event: &'a Event) -> Vec<SpanSegment<'a>> {
    let start = event.start_date();
    let total_days = event.days_spanned();

    grid.weeks()
        .enumerate()
        .filter_map(|(row, week)| {
            let (column, date) = week.iter().enumerate().find_map(|(col, cell)| {
                cell.date()
                    .filter(|d| event.occurs_on(*d))
                    .map(|d| (col, d))
            })?;

            let days_into_event = (date - start).num_days();
            let days_left_in_week = (DAYS_PER_WEEK - column) as i64;
            let days_left_in_event = total_days - days_into_event;
            let span = days_left_in_week.min(days_left_in_event).clamp(0, DAYS_PER_WEEK as i64);

            Some(SpanSegment {
                event,
                row,
                start_column: column,
                span: span as usize,
                is_start_day: date == start,
                is_end_day: days_into_event + span >= total_days,
            })
        })
        .collect()
}
