//! In-memory storage collaborator.
//!
//! Holds a directory and a flat event list, and answers [`EventQuery`]s the
//! way a relational store would: by evaluating flat conditions row by row.

use crate::entity::EntityDirectory;
use crate::error::CalendarResult;
use crate::event::Event;
use crate::query::{EventQuery, HierarchyLookup};

/// Fetches events for a composed query.
///
/// Returned events carry their owner's display name. Implementations report
/// failures as `CalendarError::FetchFailed`; an empty list means no events.
pub trait EventSource {
    fn fetch(&self, query: &EventQuery) -> impl Future<Output = CalendarResult<Vec<Event>>>;
}

#[derive(Debug, Clone, Default)]
pub struct EventStore {
    directory: EntityDirectory,
    events: Vec<Event>,
}

impl EventStore {
    pub fn new(directory: EntityDirectory, events: Vec<Event>) -> Self {
        EventStore { directory, events }
    }

    pub fn directory(&self) -> &EntityDirectory {
        &self.directory
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Matching events sorted by start, owner names filled from the directory.
    pub fn query(&self, query: &EventQuery) -> Vec<Event> {
        let mut found: Vec<Event> = self
            .events
            .iter()
            .filter(|event| query.matches(event))
            .cloned()
            .map(|mut event| {
                if event.owner_name.is_none() {
                    event.owner_name = self.directory.name_of(&event.owner).map(str::to_string);
                }
                event
            })
            .collect();

        found.sort_by_key(|e| e.start.sort_key());
        found
    }
}

impl EventSource for EventStore {
    async fn fetch(&self, query: &EventQuery) -> CalendarResult<Vec<Event>> {
        Ok(self.query(query))
    }
}

impl HierarchyLookup for EventStore {
    fn zones_in_district(&self, district_id: &str) -> CalendarResult<Vec<String>> {
        Ok(self.directory.zones_in_district(district_id))
    }

    fn clubs_in_zone(&self, zone_id: &str) -> CalendarResult<Vec<String>> {
        Ok(self.directory.clubs_in_zone(zone_id))
    }

    fn clubs_in_district(&self, district_id: &str) -> CalendarResult<Vec<String>> {
        Ok(self.directory.clubs_in_district(district_id))
    }
}
