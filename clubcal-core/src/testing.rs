//! Shared fixtures for unit tests.
//!
//! The sample tree: district-1 holds zone-1 (club-a, club-b) and
//! zone-2 (club-c).

use chrono::{NaiveDate, NaiveDateTime};

use crate::entity::{Entity, EntityDirectory, EntityRef};
use crate::event::{Event, EventTime, Visibility};

pub fn sample_directory() -> EntityDirectory {
    EntityDirectory::from_entities([
        Entity::district("district-1", "Northern District"),
        Entity::zone("zone-1", "Harbour Zone", "district-1"),
        Entity::zone("zone-2", "Valley Zone", "district-1"),
        Entity::club("club-a", "Harbour Lions", "zone-1"),
        Entity::club("club-b", "Pier Rotary", "zone-1"),
        Entity::club("club-c", "Valley Lions", "zone-2"),
    ])
}

/// The sample tree plus entities whose parents are missing: zone-x sits in
/// district-missing with club-x under it, club-y sits in zone-missing.
pub fn dangling_directory() -> EntityDirectory {
    let mut dir = sample_directory();
    dir.insert(Entity::zone("zone-x", "Drifting Zone", "district-missing"));
    dir.insert(Entity::club("club-x", "Drifting Club", "zone-x"));
    dir.insert(Entity::club("club-y", "Stray Club", "zone-missing"));
    dir
}

/// One event for each entity of [`dangling_directory`] that has no full ancestry.
pub fn dangling_events() -> Vec<Event> {
    let day = date(2024, 5, 10);
    vec![
        owned_event("dx", EntityRef::zone("zone-x"), day, day),
        owned_event("dcx", EntityRef::club("club-x"), day, day),
        owned_event("dcy", EntityRef::club("club-y"), day, day),
    ]
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

/// A public club-a event between two instants.
pub fn event_between(id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Event {
    Event {
        id: id.to_string(),
        title: Some(format!("Event {id}")),
        description: None,
        location: None,
        start: EventTime::DateTime(start),
        end: EventTime::DateTime(end),
        visibility: Visibility::Public,
        owner: EntityRef::club("club-a"),
        owner_name: None,
    }
}

/// An all-day public event owned by `owner`.
pub fn owned_event(id: &str, owner: EntityRef, start: NaiveDate, end: NaiveDate) -> Event {
    Event {
        id: id.to_string(),
        title: Some(format!("Event {id}")),
        description: None,
        location: None,
        start: EventTime::Date(start),
        end: EventTime::Date(end),
        visibility: Visibility::Public,
        owner,
        owner_name: None,
    }
}

/// One event per level of the sample tree plus an orphan:
/// e1 district-1, e2 zone-1, e3 club-a, e4 club-c, e5 zone-2, e6 orphaned club.
pub fn sample_events() -> Vec<Event> {
    let day = date(2024, 5, 10);
    vec![
        owned_event("e1", EntityRef::district("district-1"), day, day),
        owned_event("e2", EntityRef::zone("zone-1"), day, day),
        owned_event("e3", EntityRef::club("club-a"), day, day),
        owned_event("e4", EntityRef::club("club-c"), day, day),
        owned_event("e5", EntityRef::zone("zone-2"), day, day),
        owned_event("e6", EntityRef::club("club-ghost"), day, day),
    ]
}

pub fn ids(events: &[Event]) -> Vec<&str> {
    events.iter().map(|e| e.id.as_str()).collect()
}
