//! Core of the clubcal calendar.
//!
//! Decides which events are visible for a club, zone or district selection
//! and lays them out on a Sunday-first month grid:
//! - `scope` and `query` turn a [`FilterConfig`] into flat storage conditions
//! - `search` narrows the fetched events by free text
//! - `layout` buckets single-day events and computes multi-day bars
//! - `color` assigns each visible owner a palette color

pub mod color;
pub mod config;
pub mod date_range;
pub mod entity;
pub mod error;
pub mod event;
pub mod filter;
pub mod grid;
pub mod layout;
pub mod query;
pub mod scope;
pub mod search;
pub mod store;
pub mod view;

#[cfg(test)]
mod testing;

pub use entity::{Entity, EntityDirectory, EntityKind, EntityRef};
pub use error::{CalendarError, CalendarResult};
pub use event::{Event, EventTime, Visibility, VisibilityFilter};
pub use filter::{FilterConfig, FilterUpdate};
pub use scope::{Scope, ScopePredicate};
