use anyhow::Result;
use clubcal_core::Scope;
use clubcal_core::query::EventQuery;
use owo_colors::OwoColorize;

use super::{Context, ScopeArgs};

/// Show how the current filter resolves, without fetching events.
pub fn run(scope: &ScopeArgs) -> Result<()> {
    let ctx = Context::load(scope)?;

    let resolved = Scope::resolve(&ctx.filter)?;
    let query = EventQuery::compose(&resolved, &ctx.store, None)?;

    println!("{}", resolved.predicate.describe(ctx.store.directory()).bold());
    println!("  {}  {}", "Visibility:".dimmed(), serde_json::to_value(resolved.visibility)?);
    if !ctx.filter.search.trim().is_empty() {
        println!("  {}      \"{}\"", "Search:".dimmed(), ctx.filter.search);
    }
    println!("  {}       {}", "Query:".dimmed(), query);

    Ok(())
}
