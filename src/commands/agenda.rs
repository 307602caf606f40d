use anyhow::Result;
use clubcal_core::date_range::DateRange;
use clubcal_core::view::CalendarView;
use owo_colors::OwoColorize;

use super::{Context, ScopeArgs};
use crate::render::render_agenda;

pub async fn run(range: DateRange, scope: &ScopeArgs, json: bool) -> Result<()> {
    let ctx = Context::load(scope)?;

    let view = CalendarView::build(&ctx.filter, Some(range), &ctx.store, &ctx.store).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!(
        "{} {}",
        view.describe(ctx.store.directory()).dimmed(),
        format!("({range})").dimmed()
    );
    println!();
    println!("{}", render_agenda(&view.agenda(), &view.colors));

    Ok(())
}
