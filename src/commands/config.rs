use anyhow::Result;
use clubcal_core::config::ClubcalConfig;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let config_path = ClubcalConfig::config_path()?;
    let config = ClubcalConfig::load()?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Filter:     {}", ClubcalConfig::filter_path()?.display());
    println!("  Data file:  {}", config.data_path().display());
    println!();
    println!("{}", "Display".bold());
    println!("  Events per day:  {}", config.max_events_per_day);

    Ok(())
}
