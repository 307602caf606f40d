//! Scope resolution: from a filter selection to a membership predicate.
//!
//! A scope's own events are always included. Child levels join only through
//! their inclusion flag, which defaults to `true` when unset. A club
//! selection never widens.

use std::fmt;

use serde::Serialize;

use crate::entity::{EntityDirectory, EntityKind, EntityRef};
use crate::error::CalendarResult;
use crate::event::{Event, VisibilityFilter};
use crate::filter::FilterConfig;

/// Which owners an event must have to be visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScopePredicate {
    /// No entity restriction
    Unscoped,
    /// Events owned by this club only
    ExactClub { club_id: String },
    /// Events owned by the zone, plus its clubs' events when `include_clubs`
    ZoneScope { zone_id: String, include_clubs: bool },
    /// Events owned by the district, plus its zones' and clubs' events per flag
    DistrictScope {
        district_id: String,
        include_zones: bool,
        include_clubs: bool,
    },
}

impl ScopePredicate {
    /// Build the predicate for a selection. Unset flags count as `true`.
    ///
    /// The shape follows the declared kind even when the id is unknown.
    pub fn from_selection(
        selection: Option<&EntityRef>,
        include_zones: Option<bool>,
        include_clubs: Option<bool>,
    ) -> Self {
        let include_zones = include_zones.unwrap_or(true);
        let include_clubs = include_clubs.unwrap_or(true);

        match selection {
            None => ScopePredicate::Unscoped,
            Some(entity) => match entity.kind {
                EntityKind::Club => ScopePredicate::ExactClub {
                    club_id: entity.id.clone(),
                },
                EntityKind::Zone => ScopePredicate::ZoneScope {
                    zone_id: entity.id.clone(),
                    include_clubs,
                },
                EntityKind::District => ScopePredicate::DistrictScope {
                    district_id: entity.id.clone(),
                    include_zones,
                    include_clubs,
                },
            },
        }
    }

    /// The selected entity, None when unscoped.
    pub fn root(&self) -> Option<EntityRef> {
        match self {
            ScopePredicate::Unscoped => None,
            ScopePredicate::ExactClub { club_id } => Some(EntityRef::club(club_id.clone())),
            ScopePredicate::ZoneScope { zone_id, .. } => Some(EntityRef::zone(zone_id.clone())),
            ScopePredicate::DistrictScope { district_id, .. } => {
                Some(EntityRef::district(district_id.clone()))
            }
        }
    }

    /// Whether `event`'s owner falls inside this scope, walking `directory`.
    ///
    /// Child events count only when their owner resolves up to a known
    /// district through the scope root. Owners missing from the directory,
    /// or with a missing ancestor, never do.
    pub fn matches(&self, event: &Event, directory: &EntityDirectory) -> bool {
        let owner = &event.owner;
        match self {
            ScopePredicate::Unscoped => true,
            ScopePredicate::ExactClub { club_id } => {
                owner.kind == EntityKind::Club && owner.id == *club_id
            }
            ScopePredicate::ZoneScope {
                zone_id,
                include_clubs,
            } => match owner.kind {
                EntityKind::Zone => owner.id == *zone_id,
                EntityKind::Club => {
                    *include_clubs
                        && directory.resolves(owner)
                        && directory.parent_of(owner) == Some(zone_id.as_str())
                }
                EntityKind::District => false,
            },
            ScopePredicate::DistrictScope {
                district_id,
                include_zones,
                include_clubs,
            } => match owner.kind {
                EntityKind::District => owner.id == *district_id,
                EntityKind::Zone => {
                    *include_zones
                        && directory.resolves(owner)
                        && directory.parent_of(owner) == Some(district_id.as_str())
                }
                EntityKind::Club => {
                    *include_clubs
                        && directory.resolves(owner)
                        && directory
                            .parent_of(owner)
                            .and_then(|zone_id| directory.parent_of(&EntityRef::zone(zone_id)))
                            == Some(district_id.as_str())
                }
            },
        }
    }

    /// Label for display, using names from `directory` where known,
    /// e.g. `Zone "Harbour Zone" selected, +Clubs`.
    pub fn describe(&self, directory: &EntityDirectory) -> String {
        let Some(root) = self.root() else {
            return "All events".to_string();
        };

        let mut label = match directory.get(&root) {
            Some(entity) => format!("{} selected", entity.label()),
            None => format!("{} selected", self.root_label()),
        };
        for extra in self.inclusions() {
            label.push_str(", ");
            label.push_str(extra);
        }
        label
    }

    fn root_label(&self) -> String {
        match self {
            ScopePredicate::Unscoped => "All events".to_string(),
            ScopePredicate::ExactClub { club_id } => format!("Club {club_id}"),
            ScopePredicate::ZoneScope { zone_id, .. } => format!("Zone {zone_id}"),
            ScopePredicate::DistrictScope { district_id, .. } => format!("District {district_id}"),
        }
    }

    fn inclusions(&self) -> Vec<&'static str> {
        match self {
            ScopePredicate::Unscoped | ScopePredicate::ExactClub { .. } => Vec::new(),
            ScopePredicate::ZoneScope { include_clubs, .. } => {
                if *include_clubs { vec!["+Clubs"] } else { Vec::new() }
            }
            ScopePredicate::DistrictScope {
                include_zones,
                include_clubs,
                ..
            } => {
                let mut extras = Vec::new();
                if *include_zones {
                    extras.push("+Zones");
                }
                if *include_clubs {
                    extras.push("+Clubs");
                }
                extras
            }
        }
    }
}

impl fmt::Display for ScopePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root_label())?;
        for extra in self.inclusions() {
            write!(f, " {extra}")?;
        }
        Ok(())
    }
}

/// A resolved scope: owner predicate plus visibility restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scope {
    pub predicate: ScopePredicate,
    pub visibility: VisibilityFilter,
}

impl Scope {
    /// Resolve a filter selection.
    ///
    /// Fails only when the config names more than one entity.
    pub fn resolve(config: &FilterConfig) -> CalendarResult<Scope> {
        let selection = config.selection()?;
        let predicate = ScopePredicate::from_selection(
            selection.as_ref(),
            config.include_zone_events,
            config.include_club_events,
        );

        Ok(Scope {
            predicate,
            visibility: config.visibility,
        })
    }

    pub fn unscoped() -> Scope {
        Scope {
            predicate: ScopePredicate::Unscoped,
            visibility: VisibilityFilter::All,
        }
    }

    /// Predicate and visibility together.
    pub fn matches(&self, event: &Event, directory: &EntityDirectory) -> bool {
        self.visibility.allows(event.visibility) && self.predicate.matches(event, directory)
    }
}
