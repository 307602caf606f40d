//! Flattening a scope into conditions the storage collaborator understands.
//!
//! Storage evaluates only equality and membership tests on an event's own
//! columns. The hierarchy is walked here, up front, through
//! [`HierarchyLookup`], and each included level becomes one clause of a
//! disjunction.

use std::fmt;

use serde::Serialize;

use crate::date_range::DateRange;
use crate::entity::{EntityDirectory, EntityKind};
use crate::error::{CalendarError, CalendarResult};
use crate::event::Event;
use crate::scope::{Scope, ScopePredicate};

/// Child-id lookups against the organizational tree.
///
/// Implementations backed by remote storage may fail; an unknown parent id
/// is not a failure and yields an empty list.
pub trait HierarchyLookup {
    fn zones_in_district(&self, district_id: &str) -> CalendarResult<Vec<String>>;
    fn clubs_in_zone(&self, zone_id: &str) -> CalendarResult<Vec<String>>;
    fn clubs_in_district(&self, district_id: &str) -> CalendarResult<Vec<String>>;
}

impl HierarchyLookup for EntityDirectory {
    fn zones_in_district(&self, district_id: &str) -> CalendarResult<Vec<String>> {
        Ok(EntityDirectory::zones_in_district(self, district_id))
    }

    fn clubs_in_zone(&self, zone_id: &str) -> CalendarResult<Vec<String>> {
        Ok(EntityDirectory::clubs_in_zone(self, zone_id))
    }

    fn clubs_in_district(&self, district_id: &str) -> CalendarResult<Vec<String>> {
        Ok(EntityDirectory::clubs_in_district(self, district_id))
    }
}

/// Event columns a condition may test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    EntityType,
    EntityId,
    Visibility,
}

impl Field {
    fn value_of<'a>(&self, event: &'a Event) -> &'a str {
        match self {
            Field::EntityType => event.owner.kind.as_str(),
            Field::EntityId => &event.owner.id,
            Field::Visibility => event.visibility.as_str(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::EntityType => "entity_type",
            Field::EntityId => "entity_id",
            Field::Visibility => "visibility",
        })
    }
}

/// A flat test on one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Eq(Field, String),
    In(Field, Vec<String>),
}

impl Condition {
    /// `Eq` for a single value, `In` otherwise.
    fn one_of(field: Field, mut values: Vec<String>) -> Condition {
        if values.len() == 1 {
            Condition::Eq(field, values.remove(0))
        } else {
            Condition::In(field, values)
        }
    }

    pub fn matches(&self, event: &Event) -> bool {
        match self {
            Condition::Eq(field, value) => field.value_of(event) == value,
            Condition::In(field, values) => {
                let actual = field.value_of(event);
                values.iter().any(|v| v == actual)
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Eq(field, value) => write!(f, "{field} = '{value}'"),
            Condition::In(field, values) => {
                let list: Vec<String> = values.iter().map(|v| format!("'{v}'")).collect();
                write!(f, "{field} IN ({})", list.join(", "))
            }
        }
    }
}

/// A conjunction of conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clause {
    pub conditions: Vec<Condition>,
}

impl Clause {
    /// Events owned by `kind` entities with one of `ids`; None when `ids` is
    /// empty so that the clause drops out of the union.
    fn owned_by(kind: EntityKind, ids: Vec<String>) -> Option<Clause> {
        if ids.is_empty() {
            return None;
        }
        Some(Clause {
            conditions: vec![
                Condition::Eq(Field::EntityType, kind.as_str().to_string()),
                Condition::one_of(Field::EntityId, ids),
            ],
        })
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.conditions.iter().all(|c| c.matches(event))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.conditions.iter().map(|c| c.to_string()).collect();
        write!(f, "({})", parts.join(" AND "))
    }
}

/// Everything the storage collaborator needs to fetch one view's events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventQuery {
    /// Disjunction of owner clauses; None means no owner restriction
    pub scope: Option<Vec<Clause>>,
    pub visibility: Option<Condition>,
    pub window: Option<DateRange>,
}

impl EventQuery {
    /// Compose the flat query for `scope`, resolving child ids via `lookup`.
    ///
    /// A failing lookup becomes `ResolutionFailed`; it is never treated as
    /// "no members".
    pub fn compose(
        scope: &Scope,
        lookup: &dyn HierarchyLookup,
        window: Option<DateRange>,
    ) -> CalendarResult<EventQuery> {
        let clauses = match &scope.predicate {
            ScopePredicate::Unscoped => None,
            ScopePredicate::ExactClub { club_id } => {
                Some(vec![Clause::owned_by(EntityKind::Club, vec![club_id.clone()])])
            }
            ScopePredicate::ZoneScope {
                zone_id,
                include_clubs,
            } => {
                let mut clauses = vec![Clause::owned_by(EntityKind::Zone, vec![zone_id.clone()])];
                if *include_clubs {
                    let clubs = lookup
                        .clubs_in_zone(zone_id)
                        .map_err(|e| resolution_failed("clubs in zone", zone_id, e))?;
                    clauses.push(Clause::owned_by(EntityKind::Club, clubs));
                }
                Some(clauses)
            }
            ScopePredicate::DistrictScope {
                district_id,
                include_zones,
                include_clubs,
            } => {
                let mut clauses = vec![Clause::owned_by(
                    EntityKind::District,
                    vec![district_id.clone()],
                )];
                if *include_zones {
                    let zones = lookup
                        .zones_in_district(district_id)
                        .map_err(|e| resolution_failed("zones in district", district_id, e))?;
                    clauses.push(Clause::owned_by(EntityKind::Zone, zones));
                }
                if *include_clubs {
                    let clubs = lookup
                        .clubs_in_district(district_id)
                        .map_err(|e| resolution_failed("clubs in district", district_id, e))?;
                    clauses.push(Clause::owned_by(EntityKind::Club, clubs));
                }
                Some(clauses)
            }
        };

        let visibility = scope.visibility.classes().map(|classes| {
            Condition::one_of(
                Field::Visibility,
                classes.iter().map(|v| v.as_str().to_string()).collect(),
            )
        });

        Ok(EventQuery {
            scope: clauses.map(|c| c.into_iter().flatten().collect()),
            visibility,
            window,
        })
    }

    /// Evaluate the query against one event.
    pub fn matches(&self, event: &Event) -> bool {
        let in_scope = self
            .scope
            .as_ref()
            .is_none_or(|clauses| clauses.iter().any(|c| c.matches(event)));
        let visible = self.visibility.as_ref().is_none_or(|c| c.matches(event));
        let in_window = self
            .window
            .is_none_or(|w| w.overlaps(event.start_date(), event.end_date()));

        in_scope && visible && in_window
    }
}

impl fmt::Display for EventQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if let Some(clauses) = &self.scope {
            let any: Vec<String> = clauses.iter().map(|c| c.to_string()).collect();
            parts.push(any.join(" OR "));
        }
        if let Some(visibility) = &self.visibility {
            parts.push(visibility.to_string());
        }
        if let Some(window) = &self.window {
            if let Some(to) = window.to {
                parts.push(format!("start_date <= '{to}'"));
            }
            if let Some(from) = window.from {
                parts.push(format!("end_date >= '{from}'"));
            }
        }

        if parts.is_empty() {
            write!(f, "(all events)")
        } else if parts.len() == 1 {
            write!(f, "{}", parts[0])
        } else {
            let wrapped: Vec<String> = parts.iter().map(|p| format!("[{p}]")).collect();
            write!(f, "{}", wrapped.join(" AND "))
        }
    }
}

fn resolution_failed(lookup: &str, id: &str, err: CalendarError) -> CalendarError {
    CalendarError::ResolutionFailed(format!("{lookup} '{id}': {err}"))
}
