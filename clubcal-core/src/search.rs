//! Free-text search over already-scoped events.

use crate::event::Event;

/// Keep events whose title, description, location or owner name contains
/// `query`, ignoring case. A blank or whitespace-only query keeps everything
/// in order; any other query is matched as typed, spaces included.
pub fn search_events(events: Vec<Event>, query: &str) -> Vec<Event> {
    if query.trim().is_empty() {
        return events;
    }
    let needle = query.to_lowercase();

    events
        .into_iter()
        .filter(|event| matches_search(event, &needle))
        .collect()
}

/// `needle` must already be lowercase.
fn matches_search(event: &Event, needle: &str) -> bool {
    [
        event.title.as_deref(),
        event.description.as_deref(),
        event.location.as_deref(),
        event.owner_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}
