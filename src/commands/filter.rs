use anyhow::Result;
use clubcal_core::FilterConfig;
use clubcal_core::FilterUpdate;
use clubcal_core::config::ClubcalConfig;
use owo_colors::OwoColorize;

use super::ScopeArgs;

pub fn show() -> Result<()> {
    let filter = FilterConfig::load(&ClubcalConfig::filter_path()?)?;
    print_filter(&filter)
}

/// Apply `args` to the saved filter and store the result.
pub fn set(args: &ScopeArgs) -> Result<()> {
    let path = ClubcalConfig::filter_path()?;
    let saved = FilterConfig::load(&path)?;

    let updated = saved.apply_all(args.updates()?);
    // refuse to persist a selection that cannot be resolved later
    updated.selection()?;
    updated.save(&path)?;

    println!("{}", "Filter saved".green());
    print_filter(&updated)
}

pub fn reset() -> Result<()> {
    let path = ClubcalConfig::filter_path()?;
    let cleared = FilterConfig::load(&path)?.apply(FilterUpdate::Reset);
    cleared.save(&path)?;

    println!("{}", "Filter cleared".green());
    Ok(())
}

fn print_filter(filter: &FilterConfig) -> Result<()> {
    let content = toml::to_string_pretty(filter)?;
    if content.trim().is_empty() {
        println!("{}", "(no filter)".dimmed());
    } else {
        println!("{}", content.trim_end());
    }
    Ok(())
}
