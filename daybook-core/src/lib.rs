//! Core of daybook: a personal calendar of events kept in local storage.
//!
//! - `event`: the `Event` type and its `HH:MM` times
//! - `store`: the owned, observable event collection
//! - `persist`: storage adapters the store writes through
//! - `draft`: validation and conflict checks for new events
//! - `month`: the month grid and its per-day counts

pub mod config;
pub mod draft;
pub mod error;
pub mod event;
pub mod month;
pub mod persist;
pub mod store;

pub use event::{AsCalendarDay, ClockTime, Event, EventPatch};
pub use store::{EventStore, SubscriptionId};
