//! Loading the local data file that stands in for the event database.

use std::path::Path;

use clubcal_core::store::EventStore;
use clubcal_core::{
    CalendarError, CalendarResult, Entity, EntityDirectory, EntityKind, EntityRef, Event,
    EventTime, Visibility,
};
use serde::Deserialize;

#[derive(Deserialize, Default)]
struct DataFile {
    #[serde(default)]
    districts: Vec<RawEntity>,
    #[serde(default)]
    zones: Vec<RawEntity>,
    #[serde(default)]
    clubs: Vec<RawEntity>,
    #[serde(default)]
    events: Vec<RawEvent>,
}

#[derive(Deserialize)]
struct RawEntity {
    id: String,
    name: String,
    district_id: Option<String>,
    zone_id: Option<String>,
}

#[derive(Deserialize)]
struct RawEvent {
    id: String,
    title: Option<String>,
    description: Option<String>,
    location: Option<String>,
    start: Option<String>,
    end: Option<String>,
    #[serde(default)]
    visibility: Visibility,
    entity_type: EntityKind,
    entity_id: String,
}

impl RawEvent {
    fn into_event(self) -> CalendarResult<Event> {
        let start = parse_time(&self.id, "start", self.start.as_deref())?;
        let end = parse_time(&self.id, "end", self.end.as_deref())?;

        Ok(Event {
            id: self.id,
            title: self.title,
            description: self.description,
            location: self.location,
            start,
            end,
            visibility: self.visibility,
            owner: EntityRef::new(self.entity_type, self.entity_id),
            owner_name: None,
        })
    }
}

fn parse_time(event_id: &str, field: &str, value: Option<&str>) -> CalendarResult<EventTime> {
    let value = value.ok_or_else(|| {
        CalendarError::DataFile(format!("Event '{event_id}' has no {field} date"))
    })?;
    value.parse()
}

/// Read the data file at `path`.
pub fn load(path: &Path) -> CalendarResult<EventStore> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CalendarError::DataFile(format!("Could not read {}: {e}", path.display()))
    })?;
    parse(&content)
}

/// Parse data file contents. Events with missing or unreadable dates are
/// skipped with a warning; broken tree records are an error.
pub fn parse(content: &str) -> CalendarResult<EventStore> {
    let data: DataFile =
        toml::from_str(content).map_err(|e| CalendarError::DataFile(e.to_string()))?;

    let mut directory = EntityDirectory::new();

    for raw in data.districts {
        directory.insert(Entity::district(&raw.id, &raw.name));
    }
    for raw in data.zones {
        let district_id = raw.district_id.ok_or_else(|| {
            CalendarError::DataFile(format!("Zone '{}' has no district_id", raw.id))
        })?;
        directory.insert(Entity::zone(&raw.id, &raw.name, &district_id));
    }
    for raw in data.clubs {
        let zone_id = raw.zone_id.ok_or_else(|| {
            CalendarError::DataFile(format!("Club '{}' has no zone_id", raw.id))
        })?;
        directory.insert(Entity::club(&raw.id, &raw.name, &zone_id));
    }

    let mut events = Vec::with_capacity(data.events.len());
    for raw in data.events {
        let id = raw.id.clone();
        match raw.into_event() {
            Ok(event) => {
                if !directory.resolves(&event.owner) {
                    tracing::debug!(
                        event_id = %event.id,
                        owner = %event.owner,
                        "event owner is not in the tree"
                    );
                }
                events.push(event);
            }
            Err(e) => tracing::warn!(event_id = %id, "skipping event: {e}"),
        }
    }

    Ok(EventStore::new(directory, events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clubcal_core::query::HierarchyLookup;

    const SAMPLE: &str = r#"
[[districts]]
id = "d1"
name = "Northern District"

[[zones]]
id = "z1"
name = "Harbour Zone"
district_id = "d1"

[[clubs]]
id = "c1"
name = "Harbour Lions"
zone_id = "z1"

[[events]]
id = "gala"
title = "Spring Gala"
start = "2024-03-30T18:00:00"
end = "2024-03-30T23:00:00"
visibility = "public"
entity_type = "club"
entity_id = "c1"

[[events]]
id = "retreat"
title = "Leadership Retreat"
start = "2024-03-30"
end = "2024-04-02"
visibility = "internal"
entity_type = "district"
entity_id = "d1"

[[events]]
id = "undated"
title = "Someday"
entity_type = "zone"
entity_id = "z1"

[[events]]
id = "garbled"
start = "next tuesday"
end = "2024-04-02"
entity_type = "zone"
entity_id = "z1"
"#;

    #[test]
    fn test_parse_sample() {
        let store = parse(SAMPLE).unwrap();

        assert_eq!(store.directory().len(), 3);
        assert_eq!(store.clubs_in_district("d1").unwrap(), vec!["c1"]);

        let ids: Vec<_> = store.events().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["gala", "retreat"]);
        assert_eq!(store.events()[1].visibility, Visibility::Internal);
        assert!(store.events()[1].start.is_all_day());
    }

    #[test]
    fn test_zone_without_district_is_an_error() {
        let content = "[[zones]]\nid = \"z1\"\nname = \"Lost\"\n";
        assert!(matches!(parse(content), Err(CalendarError::DataFile(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(CalendarError::DataFile(_))));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendar.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let store = load(&path).unwrap();
        assert_eq!(store.events().len(), 2);
    }
}
