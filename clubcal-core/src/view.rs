//! One render pass: resolve → compose → fetch → search → colorize.
//!
//! Nothing here is cached between calls. The same filter config, window and
//! collaborator data always give the same view.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::color::{ColorMap, assign_colors};
use crate::date_range::DateRange;
use crate::entity::EntityDirectory;
use crate::error::{CalendarError, CalendarResult};
use crate::event::Event;
use crate::filter::FilterConfig;
use crate::grid::MonthGrid;
use crate::layout::MonthLayout;
use crate::query::{EventQuery, HierarchyLookup};
use crate::scope::Scope;
use crate::search::search_events;
use crate::store::EventSource;

/// The visible events of one view and their colors.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarView {
    pub scope: Scope,
    pub query: EventQuery,
    /// Fetched, searched events ordered as the source returned them
    pub events: Vec<Event>,
    pub colors: ColorMap,
}

impl CalendarView {
    /// Run the whole pipeline for `config` over `window`.
    ///
    /// Hierarchy and fetch failures are returned as `ResolutionFailed` and
    /// `FetchFailed`; callers should keep their previous view on error.
    pub async fn build<L, S>(
        config: &FilterConfig,
        window: Option<DateRange>,
        lookup: &L,
        source: &S,
    ) -> CalendarResult<Self>
    where
        L: HierarchyLookup,
        S: EventSource,
    {
        let scope = Scope::resolve(config)?;
        let query = EventQuery::compose(&scope, lookup, window)?;
        tracing::debug!(scope = %scope.predicate, query = %query, "composed event query");

        let fetched = source.fetch(&query).await.map_err(|e| match e {
            CalendarError::FetchFailed(_) => e,
            other => CalendarError::FetchFailed(other.to_string()),
        })?;
        let fetched_count = fetched.len();

        let events = search_events(fetched, &config.search);
        tracing::debug!(
            fetched = fetched_count,
            visible = events.len(),
            "filtered events"
        );

        let colors = assign_colors(events.iter().map(|e| &e.owner));

        Ok(CalendarView {
            scope,
            query,
            events,
            colors,
        })
    }

    /// Month layout of the visible events.
    pub fn layout(&self, grid: &MonthGrid, max_per_day: usize) -> MonthLayout<'_> {
        MonthLayout::build(grid, &self.events, max_per_day)
    }

    pub fn describe(&self, directory: &EntityDirectory) -> String {
        self.scope.predicate.describe(directory)
    }

    /// Events per day, each multi-day event listed on every day it covers.
    /// Days outside the query window are left out.
    pub fn agenda(&self) -> BTreeMap<NaiveDate, Vec<&Event>> {
        let window = self.query.window.unwrap_or(DateRange {
            from: None,
            to: None,
        });
        let mut days: BTreeMap<NaiveDate, Vec<&Event>> = BTreeMap::new();

        for event in self.events.iter().filter(|e| !e.is_malformed()) {
            let first = window
                .from
                .map_or(event.start_date(), |from| from.max(event.start_date()));
            let last = window
                .to
                .map_or(event.end_date(), |to| to.min(event.end_date()));

            let mut day = first;
            while day <= last {
                days.entry(day).or_default().push(event);
                day += Duration::days(1);
            }
        }

        for events in days.values_mut() {
            events.sort_by_key(|e| e.start.sort_key());
        }
        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityRef;
    use crate::filter::FilterUpdate;
    use crate::layout::DEFAULT_MAX_EVENTS_PER_DAY;
    use crate::store::EventStore;
    use crate::testing::{date, ids, owned_event, sample_directory, sample_events};

    struct DownSource;

    impl EventSource for DownSource {
        async fn fetch(&self, _: &EventQuery) -> CalendarResult<Vec<Event>> {
            Err(CalendarError::Io(std::io::Error::other("storage offline")))
        }
    }

    struct DownLookup;

    impl HierarchyLookup for DownLookup {
        fn zones_in_district(&self, _: &str) -> CalendarResult<Vec<String>> {
            Err(CalendarError::ResolutionFailed("timeout".into()))
        }
        fn clubs_in_zone(&self, _: &str) -> CalendarResult<Vec<String>> {
            Err(CalendarError::ResolutionFailed("timeout".into()))
        }
        fn clubs_in_district(&self, _: &str) -> CalendarResult<Vec<String>> {
            Err(CalendarError::ResolutionFailed("timeout".into()))
        }
    }

    fn store() -> EventStore {
        EventStore::new(sample_directory(), sample_events())
    }

    #[tokio::test]
    async fn test_district_with_zones_but_not_clubs() {
        let store = store();
        let config = FilterConfig::default().apply_all([
            FilterUpdate::Select(Some(EntityRef::district("district-1"))),
            FilterUpdate::IncludeZoneEvents(Some(true)),
            FilterUpdate::IncludeClubEvents(Some(false)),
        ]);
        let view = CalendarView::build(&config, None, &store, &store).await.unwrap();

        assert_eq!(ids(&view.events), vec!["e1", "e2", "e5"]);
        assert_eq!(
            view.describe(store.directory()),
            "District \"Northern District\" selected, +Zones"
        );
    }

    #[tokio::test]
    async fn test_search_applies_after_scope() {
        let store = store();
        let config = FilterConfig::default().apply_all([
            FilterUpdate::Select(Some(EntityRef::zone("zone-1"))),
            FilterUpdate::Search("harbour".into()),
        ]);
        let view = CalendarView::build(&config, None, &store, &store).await.unwrap();

        // both match through their owner names
        assert_eq!(ids(&view.events), vec!["e2", "e3"]);
    }

    #[tokio::test]
    async fn test_colors_cover_visible_owners_only() {
        let store = store();
        let config = FilterConfig::default()
            .apply(FilterUpdate::Select(Some(EntityRef::club("club-a"))));
        let view = CalendarView::build(&config, None, &store, &store).await.unwrap();

        assert_eq!(view.colors.len(), 1);
        assert!(view.colors.get(&EntityRef::club("club-a")).is_some());
    }

    #[tokio::test]
    async fn test_rebuild_is_idempotent() {
        let store = store();
        let config = FilterConfig::default()
            .apply(FilterUpdate::Select(Some(EntityRef::district("district-1"))));

        let first = CalendarView::build(&config, None, &store, &store).await.unwrap();
        let second = CalendarView::build(&config, None, &store, &store).await.unwrap();

        assert_eq!(first.events, second.events);
        assert_eq!(first.colors, second.colors);
        assert_eq!(first.query, second.query);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_an_empty_view() {
        let store = store();
        let result = CalendarView::build(&FilterConfig::default(), None, &store, &DownSource).await;

        assert!(matches!(result, Err(CalendarError::FetchFailed(_))));
    }

    #[tokio::test]
    async fn test_resolution_failure_propagates() {
        let store = store();
        let config = FilterConfig::default()
            .apply(FilterUpdate::Select(Some(EntityRef::zone("zone-1"))));
        let result = CalendarView::build(&config, None, &DownLookup, &store).await;

        let err = result.unwrap_err();
        assert!(matches!(err, CalendarError::ResolutionFailed(_)));
        assert!(err.is_structural());
    }

    #[tokio::test]
    async fn test_month_window_and_layout() {
        let directory = sample_directory();
        let mut events = sample_events();
        events.push(owned_event(
            "trip",
            EntityRef::zone("zone-1"),
            date(2024, 5, 30),
            date(2024, 6, 2),
        ));
        events.push(owned_event(
            "april",
            EntityRef::zone("zone-1"),
            date(2024, 4, 12),
            date(2024, 4, 12),
        ));
        let store = EventStore::new(directory, events);
        let grid = MonthGrid::new(2024, 5).unwrap();

        let view =
            CalendarView::build(&FilterConfig::default(), Some(grid.window()), &store, &store)
                .await
                .unwrap();
        assert!(!ids(&view.events).contains(&"april"));

        let layout = view.layout(&grid, DEFAULT_MAX_EVENTS_PER_DAY);
        assert_eq!(layout.day(date(2024, 5, 10)).unwrap().single_day.len(), 3);
        assert_eq!(layout.day(date(2024, 5, 10)).unwrap().overflow, 3);
        assert_eq!(layout.segments_for("trip").count(), 1);
    }

    #[tokio::test]
    async fn test_agenda_clips_multi_day_events_to_window() {
        let events = vec![owned_event(
            "camp",
            EntityRef::club("club-a"),
            date(2024, 5, 30),
            date(2024, 6, 2),
        )];
        let store = EventStore::new(sample_directory(), events);
        let window = DateRange::new(date(2024, 5, 1), date(2024, 5, 31));

        let view = CalendarView::build(&FilterConfig::default(), Some(window), &store, &store)
            .await
            .unwrap();
        let agenda = view.agenda();

        assert_eq!(
            agenda.keys().copied().collect::<Vec<_>>(),
            vec![date(2024, 5, 30), date(2024, 5, 31)]
        );
    }
}
