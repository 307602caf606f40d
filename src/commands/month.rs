use anyhow::Result;
use chrono::{Datelike, Local};
use clubcal_core::grid::MonthGrid;
use clubcal_core::view::CalendarView;
use owo_colors::OwoColorize;

use super::{Context, ScopeArgs};
use crate::render::{render_legend, render_month};

pub async fn run(
    year: Option<i32>,
    month: Option<u32>,
    scope: &ScopeArgs,
    json: bool,
) -> Result<()> {
    let ctx = Context::load(scope)?;

    let today = Local::now().date_naive();
    let grid = MonthGrid::new(year.unwrap_or(today.year()), month.unwrap_or(today.month()))?;

    let view = CalendarView::build(&ctx.filter, Some(grid.window()), &ctx.store, &ctx.store).await?;
    let layout = view.layout(&grid, ctx.config.max_events_per_day);

    if json {
        let output = serde_json::json!({
            "scope": view.describe(ctx.store.directory()),
            "grid": &grid,
            "layout": &layout,
            "colors": &view.colors,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", view.describe(ctx.store.directory()).dimmed());
    println!();
    println!("{}", render_month(&grid, &layout, &view.colors));

    if !view.colors.is_empty() {
        println!();
        println!("{}", render_legend(&view.colors, ctx.store.directory()));
    }

    if !layout.skipped.is_empty() {
        println!();
        println!(
            "{}",
            format!("{} event(s) with unusable dates were left out", layout.skipped.len()).yellow()
        );
    }

    Ok(())
}
