//! Persisted filter state.
//!
//! `FilterConfig` is a plain value: callers pass it down to every resolve and
//! layout call, and change it only through [`FilterConfig::apply`], which
//! returns a new value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entity::{EntityKind, EntityRef};
use crate::error::{CalendarError, CalendarResult};
use crate::event::VisibilityFilter;

/// The user's current selection: scope, visibility and search text.
///
/// At most one of `district_id`, `zone_id` and `club_id` may be set. The
/// inclusion flags only matter for zone and district selections; an unset
/// flag counts as `true`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    #[serde(default)]
    pub search: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_id: Option<String>,

    #[serde(default)]
    pub visibility: VisibilityFilter,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_zone_events: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_club_events: Option<bool>,
}

/// A single change to a [`FilterConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterUpdate {
    Search(String),
    /// Select an entity (clearing any other selection) or clear the selection
    Select(Option<EntityRef>),
    Visibility(VisibilityFilter),
    IncludeZoneEvents(Option<bool>),
    IncludeClubEvents(Option<bool>),
    Reset,
}

impl FilterConfig {
    /// Return a copy of this config with `update` applied.
    pub fn apply(&self, update: FilterUpdate) -> FilterConfig {
        let mut next = self.clone();
        match update {
            FilterUpdate::Search(search) => next.search = search,
            FilterUpdate::Select(selection) => {
                next.district_id = None;
                next.zone_id = None;
                next.club_id = None;
                if let Some(entity) = selection {
                    let slot = match entity.kind {
                        EntityKind::District => &mut next.district_id,
                        EntityKind::Zone => &mut next.zone_id,
                        EntityKind::Club => &mut next.club_id,
                    };
                    *slot = Some(entity.id);
                }
            }
            FilterUpdate::Visibility(visibility) => next.visibility = visibility,
            FilterUpdate::IncludeZoneEvents(flag) => next.include_zone_events = flag,
            FilterUpdate::IncludeClubEvents(flag) => next.include_club_events = flag,
            FilterUpdate::Reset => next = FilterConfig::default(),
        }
        next
    }

    /// Apply several updates in order.
    pub fn apply_all(&self, updates: impl IntoIterator<Item = FilterUpdate>) -> FilterConfig {
        updates
            .into_iter()
            .fold(self.clone(), |config, update| config.apply(update))
    }

    /// The selected entity. Blank ids count as unset.
    pub fn selection(&self) -> CalendarResult<Option<EntityRef>> {
        let populated: Vec<EntityRef> = [
            (EntityKind::District, &self.district_id),
            (EntityKind::Zone, &self.zone_id),
            (EntityKind::Club, &self.club_id),
        ]
        .into_iter()
        .filter_map(|(kind, id)| {
            id.as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| EntityRef::new(kind, id))
        })
        .collect();

        match populated.as_slice() {
            [] => Ok(None),
            [one] => Ok(Some(one.clone())),
            many => Err(CalendarError::Config(format!(
                "Only one of districtId, zoneId and clubId may be set (got {})",
                many.iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    /// Load filter state from a TOML file, defaulting when it does not exist.
    pub fn load(path: &Path) -> CalendarResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: FilterConfig =
                toml::from_str(&content).map_err(|e| CalendarError::Config(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save filter state as TOML.
    pub fn save(&self, path: &Path) -> CalendarResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| CalendarError::Config(e.to_string()))?;

        std::fs::write(path, content)?;

        Ok(())
    }
}
