pub mod agenda;
pub mod config;
pub mod filter;
pub mod month;
pub mod scope;

use anyhow::{Context as _, Result};
use clap::Args;
use clubcal_core::config::ClubcalConfig;
use clubcal_core::store::EventStore;
use clubcal_core::{EntityRef, FilterConfig, FilterUpdate, VisibilityFilter};

use crate::data_file;

/// Common context for view commands, loaded once per invocation.
pub struct Context {
    pub config: ClubcalConfig,
    pub store: EventStore,
    /// Saved filter with this invocation's overrides applied
    pub filter: FilterConfig,
}

impl Context {
    pub fn load(overrides: &ScopeArgs) -> Result<Self> {
        let config = ClubcalConfig::load()?;
        let data_path = config.data_path();
        let store = data_file::load(&data_path).with_context(|| {
            format!(
                "Could not load calendar data.\n\
                Create {} or point data_file in {} at your data file",
                data_path.display(),
                ClubcalConfig::config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "config.toml".into())
            )
        })?;

        let saved = FilterConfig::load(&ClubcalConfig::filter_path()?)?;
        let filter = saved.apply_all(overrides.updates()?);

        Ok(Context {
            config,
            store,
            filter,
        })
    }
}

/// Scope options shared by the view commands. Each one overrides the saved
/// filter for this invocation only.
#[derive(Args, Debug, Default, Clone)]
pub struct ScopeArgs {
    /// Show events of this district
    #[arg(long, conflicts_with_all = ["zone", "club", "everything"])]
    pub district: Option<String>,

    /// Show events of this zone
    #[arg(long, conflicts_with_all = ["club", "everything"])]
    pub zone: Option<String>,

    /// Show events of this club only
    #[arg(long, conflicts_with = "everything")]
    pub club: Option<String>,

    /// Drop any saved selection and show every entity's events
    #[arg(long)]
    pub everything: bool,

    /// Leave out zone events when a district is selected
    #[arg(long)]
    pub no_zones: bool,

    /// Leave out club events when a zone or district is selected
    #[arg(long)]
    pub no_clubs: bool,

    /// all, public or private
    #[arg(long)]
    pub visibility: Option<String>,

    /// Only events whose title, description, location or owner contains this
    #[arg(short, long)]
    pub search: Option<String>,
}

impl ScopeArgs {
    /// Filter updates for the given options, in application order.
    pub fn updates(&self) -> Result<Vec<FilterUpdate>> {
        let mut updates = Vec::new();

        let selection = if let Some(id) = &self.district {
            Some(Some(EntityRef::district(id.clone())))
        } else if let Some(id) = &self.zone {
            Some(Some(EntityRef::zone(id.clone())))
        } else if let Some(id) = &self.club {
            Some(Some(EntityRef::club(id.clone())))
        } else if self.everything {
            Some(None)
        } else {
            None
        };
        if let Some(selection) = selection {
            updates.push(FilterUpdate::Select(selection));
        }

        if self.no_zones {
            updates.push(FilterUpdate::IncludeZoneEvents(Some(false)));
        }
        if self.no_clubs {
            updates.push(FilterUpdate::IncludeClubEvents(Some(false)));
        }
        if let Some(visibility) = &self.visibility {
            updates.push(FilterUpdate::Visibility(visibility.parse::<VisibilityFilter>()?));
        }
        if let Some(search) = &self.search {
            updates.push(FilterUpdate::Search(search.clone()));
        }

        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_options_no_updates() {
        assert!(ScopeArgs::default().updates().unwrap().is_empty());
    }

    #[test]
    fn test_overrides_apply_on_top_of_saved_filter() {
        let saved = FilterConfig::default()
            .apply(FilterUpdate::Select(Some(EntityRef::club("c1"))));
        let args = ScopeArgs {
            zone: Some("z1".into()),
            no_clubs: true,
            visibility: Some("public".into()),
            ..Default::default()
        };

        let filter = saved.apply_all(args.updates().unwrap());

        assert_eq!(filter.club_id, None);
        assert_eq!(filter.zone_id.as_deref(), Some("z1"));
        assert_eq!(filter.include_club_events, Some(false));
        assert_eq!(filter.visibility, VisibilityFilter::Public);
    }

    #[test]
    fn test_everything_clears_selection() {
        let saved = FilterConfig::default()
            .apply(FilterUpdate::Select(Some(EntityRef::district("d1"))));
        let args = ScopeArgs {
            everything: true,
            ..Default::default()
        };

        assert_eq!(saved.apply_all(args.updates().unwrap()).selection().unwrap(), None);
    }

    #[test]
    fn test_bad_visibility() {
        let args = ScopeArgs {
            visibility: Some("secret".into()),
            ..Default::default()
        };
        assert!(args.updates().is_err());
    }
}
