//! Terminal rendering for calendar views.
//!
//! Palette colors are hex strings meant for a browser; here they become
//! truecolor escapes via owo_colors.

use std::collections::BTreeMap;

use chrono::{Datelike, Local, NaiveDate};
use clubcal_core::color::{ColorMap, PaletteColor};
use clubcal_core::grid::{DAYS_PER_WEEK, GridCell, MonthGrid};
use clubcal_core::layout::{MonthLayout, SpanSegment};
use clubcal_core::{EntityDirectory, Event, EventTime};
use owo_colors::OwoColorize;

/// Terminal columns per day cell.
const CELL_WIDTH: usize = 16;

const WEEKDAYS: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for EventTime {
    fn render(&self) -> String {
        match self {
            EventTime::Date(_) => "all-day".to_string(),
            EventTime::DateTime(dt) => format!("{:>7}", dt.format("%H:%M")),
        }
    }
}

/// Parse `#RRGGBB`; anything else renders as mid grey.
fn hex_rgb(hex: &str) -> (u8, u8, u8) {
    let digits = hex.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(128)
    };
    (channel(0..2), channel(2..4), channel(4..6))
}

/// Text drawn in an entity's palette colors.
fn paint(text: &str, color: PaletteColor) -> String {
    let (fr, fg, fb) = hex_rgb(color.text);
    let (br, bg, bb) = hex_rgb(color.background);
    text.truecolor(fr, fg, fb).on_truecolor(br, bg, bb).to_string()
}

/// Owner tag in the owner's text color, e.g. `[Harbour Lions]`.
fn owner_tag(event: &Event, colors: &ColorMap) -> String {
    let (r, g, b) = hex_rgb(colors.color_for(&event.owner).text);
    format!("[{}]", event.owner_display()).truecolor(r, g, b).to_string()
}

/// Pad or cut `text` to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{text}{}", " ".repeat(width - count))
    } else if width == 0 {
        String::new()
    } else {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}

fn render_segment(segment: &SpanSegment, colors: &ColorMap) -> String {
    let width = (segment.span * CELL_WIDTH).saturating_sub(1);
    let label = if segment.shows_label() {
        format!(" {}", segment.event.display_title())
    } else {
        " …".to_string()
    };
    let cap = if segment.is_end_day { "" } else { "▸" };
    let body = fit(&label, width.saturating_sub(cap.chars().count()));

    format!(
        "{}{}",
        " ".repeat(segment.start_column * CELL_WIDTH),
        paint(&format!("{body}{cap}"), colors.color_for(&segment.event.owner))
    )
}

/// Draw a month grid with its events.
///
/// Multi-day bars get a line each under the day numbers of their week;
/// single-day events follow, one line per slot, then "+N more".
pub fn render_month(grid: &MonthGrid, layout: &MonthLayout, colors: &ColorMap) -> String {
    let today = Local::now().date_naive();
    let mut lines = Vec::new();

    lines.push(format!("{}", grid.title().bold()));
    lines.push(
        WEEKDAYS
            .iter()
            .map(|d| fit(d, CELL_WIDTH))
            .collect::<String>()
            .dimmed()
            .to_string(),
    );

    for (row, week) in grid.weeks().enumerate() {
        lines.push("─".repeat(CELL_WIDTH * DAYS_PER_WEEK).dimmed().to_string());
        lines.push(render_day_numbers(week, today));

        for segment in layout.segments_in_row(row) {
            lines.push(render_segment(segment, colors));
        }

        let slots: Vec<_> = week
            .iter()
            .map(|cell| cell.date().and_then(|date| layout.day(date)))
            .collect();
        let depth = slots
            .iter()
            .flatten()
            .map(|day| day.single_day.len() + usize::from(day.overflow > 0))
            .max()
            .unwrap_or(0);

        for line in 0..depth {
            let mut text = String::new();
            for day in &slots {
                let cell = match day {
                    Some(day) if line < day.single_day.len() => {
                        let event = day.single_day[line];
                        paint(
                            &fit(event.display_title(), CELL_WIDTH - 1),
                            colors.color_for(&event.owner),
                        ) + " "
                    }
                    Some(day) if line == day.single_day.len() && day.overflow > 0 => {
                        fit(&format!("+{} more", day.overflow), CELL_WIDTH)
                            .dimmed()
                            .to_string()
                    }
                    _ => " ".repeat(CELL_WIDTH),
                };
                text.push_str(&cell);
            }
            lines.push(text.trim_end().to_string());
        }
    }

    lines.join("\n")
}

fn render_day_numbers(week: &[GridCell], today: NaiveDate) -> String {
    week.iter()
        .map(|cell| match cell {
            GridCell::Blank => " ".repeat(CELL_WIDTH),
            GridCell::Day(date) if *date == today => {
                fit(&date.day().to_string(), CELL_WIDTH).bold().underline().to_string()
            }
            GridCell::Day(date) => fit(&date.day().to_string(), CELL_WIDTH),
        })
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// One line per visible owner with its color swatch.
pub fn render_legend(colors: &ColorMap, directory: &EntityDirectory) -> String {
    colors
        .iter()
        .map(|(owner, assignment)| {
            let name = directory
                .get(owner)
                .map(|e| e.label())
                .unwrap_or_else(|| owner.to_string());
            format!("  {} {}", paint("    ", assignment.color), name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Events grouped by day, e.g. "Today", "Tomorrow", "Wed Feb 25".
pub fn render_agenda(agenda: &BTreeMap<NaiveDate, Vec<&Event>>, colors: &ColorMap) -> String {
    if agenda.is_empty() {
        return "No events found".dimmed().to_string();
    }

    let today = Local::now().date_naive();
    let mut lines = Vec::new();

    for (date, events) in agenda {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format_date_label(*date, today).bold().to_string());

        for event in events {
            let time = if event.start_date() == *date {
                event.start.render()
            } else {
                format!("{:>7}", "cont.")
            };
            let mut line = format!(
                "  {} {} {}",
                time,
                event.display_title(),
                owner_tag(event, colors)
            );
            if let Some(location) = &event.location {
                line.push_str(&format!(" {}", format!("@ {location}").dimmed()));
            }
            lines.push(line);
        }
    }

    lines.join("\n")
}

fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clubcal_core::color::assign_colors;
    use clubcal_core::{Entity, EntityRef};

    #[test]
    fn test_hex_rgb() {
        assert_eq!(hex_rgb("#1E40AF"), (0x1E, 0x40, 0xAF));
        assert_eq!(hex_rgb("oops"), (128, 128, 128));
    }

    #[test]
    fn test_legend_names_each_owner_by_kind() {
        let directory = EntityDirectory::from_entities([
            Entity::district("x", "North"),
            Entity::zone("x", "Harbour", "x"),
        ]);
        let colors = assign_colors(&[EntityRef::zone("x"), EntityRef::district("x")]);

        let legend = render_legend(&colors, &directory);
        let lines: Vec<&str> = legend.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("District \"North\""));
        assert!(lines[1].ends_with("Zone \"Harbour\""));
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("Gala", 6), "Gala  ");
        assert_eq!(fit("Leadership Retreat", 8), "Leaders…");
        assert_eq!(fit("abc", 0), "");
    }

    #[test]
    fn test_format_date_label() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 24).unwrap();
        assert_eq!(format_date_label(today, today), "Today");
        assert_eq!(format_date_label(today.succ_opt().unwrap(), today), "Tomorrow");
        assert_eq!(
            format_date_label(NaiveDate::from_ymd_opt(2025, 2, 26).unwrap(), today),
            "Wed Feb 26"
        );
    }
}
