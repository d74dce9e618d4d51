//! The event store.
//!
//! [`EventStore`] owns the authoritative, insertion-ordered list of events
//! and a [`Storage`] adapter. Every mutation builds a new collection, swaps
//! it in, writes it through the adapter and notifies subscribers.
//!
//! The store does not validate what it is given. Required fields, time
//! ordering and conflict checks belong to the caller (see [`crate::draft`]).

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::PersistenceResult;
use crate::event::{AsCalendarDay, Event, EventPatch};
use crate::persist::Storage;

/// Handle returned by [`EventStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[Event])>;

pub struct EventStore<S: Storage> {
    storage: S,
    events: Arc<[Event]>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: Storage> EventStore<S> {
    /// Rehydrate a store from `storage`.
    ///
    /// An unreadable snapshot is logged and replaced by an empty collection;
    /// the bad entry is left on disk until the next mutation overwrites it.
    pub fn open(storage: S) -> Self {
        let events = match storage.load() {
            Ok(events) => {
                debug!(count = events.len(), "loaded events");
                events
            }
            Err(err) => {
                warn!(error = %err, "could not read stored events, starting empty");
                Vec::new()
            }
        };

        EventStore {
            storage,
            events: events.into(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The current collection.
    ///
    /// The returned snapshot is never modified; later mutations replace the
    /// store's collection instead.
    pub fn events(&self) -> Arc<[Event]> {
        Arc::clone(&self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get_event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Append `event`. The caller guarantees a unique id.
    ///
    /// On a storage error the event is still in the store for this session.
    pub fn add_event(&mut self, event: Event) -> PersistenceResult<()> {
        info!(id = %event.id, date = %event.date, "adding event");

        let mut next = Vec::with_capacity(self.events.len() + 1);
        next.extend_from_slice(&self.events);
        next.push(event);
        self.commit(next)
    }

    /// Merge `patch` into the event with `id`.
    ///
    /// Returns `Ok(false)` without saving or notifying when no event has
    /// that id.
    pub fn update_event(&mut self, id: &str, patch: &EventPatch) -> PersistenceResult<bool> {
        if self.get_event(id).is_none() {
            debug!(id, "update for unknown event ignored");
            return Ok(false);
        }

        info!(id, "updating event");
        let next = self
            .events
            .iter()
            .map(|e| if e.id == id { e.patched(patch) } else { e.clone() })
            .collect();
        self.commit(next)?;
        Ok(true)
    }

    /// Remove the event with `id`.
    ///
    /// Returns `Ok(false)` without saving or notifying when no event has
    /// that id.
    pub fn delete_event(&mut self, id: &str) -> PersistenceResult<bool> {
        if self.get_event(id).is_none() {
            debug!(id, "delete for unknown event ignored");
            return Ok(false);
        }

        info!(id, "deleting event");
        let next = self.events.iter().filter(|e| e.id != id).cloned().collect();
        self.commit(next)?;
        Ok(true)
    }

    /// Drop every event and delete the storage entry.
    pub fn clear(&mut self) -> PersistenceResult<()> {
        info!(count = self.events.len(), "clearing all events");
        self.events = Arc::from(Vec::new());
        let result = self.storage.remove();
        if let Err(err) = &result {
            warn!(error = %err, "could not remove stored events");
        }
        self.notify();
        result
    }

    /// Events on the same calendar day as `date`, in insertion order.
    pub fn get_events_for_date(&self, date: impl AsCalendarDay) -> Vec<&Event> {
        let day = date.calendar_day();
        self.events.iter().filter(|e| e.is_on(day)).collect()
    }

    /// Events whose name or description contains `keyword`, ignoring case.
    pub fn filter_events(&self, keyword: &str) -> Vec<&Event> {
        let needle = keyword.to_lowercase();
        self.events
            .iter()
            .filter(|e| e.matches_lowercase(&needle))
            .collect()
    }

    /// Number of events per day for days in `from..=to` that have any.
    pub fn count_by_date(&self, from: NaiveDate, to: NaiveDate) -> BTreeMap<NaiveDate, usize> {
        let mut counts = BTreeMap::new();
        for event in self.events.iter().filter(|e| e.date >= from && e.date <= to) {
            *counts.entry(event.date).or_insert(0) += 1;
        }
        counts
    }

    /// Register `listener` to be called with the new collection after every
    /// mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&[Event]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn commit(&mut self, next: Vec<Event>) -> PersistenceResult<()> {
        self.events = next.into();

        let result = self.storage.save(&self.events);
        if let Err(err) = &result {
            warn!(error = %err, "could not persist events, keeping them in memory");
        }

        self.notify();
        result
    }

    fn notify(&mut self) {
        let events = Arc::clone(&self.events);
        let events: &[Event] = &events;
        for (_, listener) in &mut self.listeners {
            listener(events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistenceError;
    use crate::event::ClockTime;
    use crate::persist::MemoryStorage;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn time(s: &str) -> ClockTime {
        ClockTime::parse(s).unwrap()
    }

    fn event(id: &str, name: &str, date: NaiveDate, start: &str, end: &str) -> Event {
        Event {
            id: id.to_string(),
            name: name.to_string(),
            date,
            start_time: time(start),
            end_time: time(end),
            description: None,
            color: None,
        }
    }

    fn store() -> EventStore<MemoryStorage> {
        EventStore::open(MemoryStorage::new())
    }

    fn ids(events: &[&Event]) -> Vec<String> {
        events.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn standup_lifecycle() {
        let mut store = store();
        assert!(store.is_empty());

        store
            .add_event(event("1", "Standup", day(1), "09:00", "09:15"))
            .unwrap();

        let on_day = store.get_events_for_date(day(1));
        assert_eq!(on_day.len(), 1);
        assert_eq!(on_day[0].name, "Standup");

        assert!(store.delete_event("1").unwrap());
        assert!(store.get_events_for_date(day(1)).is_empty());
    }

    #[test]
    fn keeps_insertion_order_not_date_order() {
        let mut store = store();
        store.add_event(event("late", "Late", day(1), "15:00", "16:00")).unwrap();
        store.add_event(event("other", "Other", day(2), "08:00", "09:00")).unwrap();
        store.add_event(event("early", "Early", day(1), "08:00", "09:00")).unwrap();

        assert_eq!(ids(&store.get_events_for_date(day(1))), vec!["late", "early"]);
        let all: Vec<_> = store.events().iter().map(|e| e.id.clone()).collect();
        assert_eq!(all, vec!["late", "other", "early"]);
    }

    #[test]
    fn get_events_for_date_ignores_time_of_day() {
        let mut store = store();
        store.add_event(event("1", "Standup", day(1), "09:00", "09:15")).unwrap();

        let evening = day(1).and_hms_opt(22, 45, 0).unwrap();
        assert_eq!(store.get_events_for_date(evening).len(), 1);
        assert!(store.get_events_for_date(day(2)).is_empty());
    }

    #[test]
    fn update_only_changes_patched_fields_of_the_target() {
        let mut store = store();
        store.add_event(event("1", "Standup", day(1), "09:00", "09:15")).unwrap();
        store.add_event(event("2", "Lunch", day(1), "12:00", "13:00")).unwrap();
        let untouched = store.get_event("2").cloned();

        let patch = EventPatch {
            end_time: Some(time("09:30")),
            ..Default::default()
        };
        assert!(store.update_event("1", &patch).unwrap());

        let updated = store.get_event("1").unwrap();
        assert_eq!(updated.end_time, time("09:30"));
        assert_eq!(updated.name, "Standup");
        assert_eq!(updated.start_time, time("09:00"));
        assert_eq!(store.get_event("2").cloned(), untouched);
    }

    #[test]
    fn update_can_move_an_event_to_another_day() {
        let mut store = store();
        store.add_event(event("1", "Standup", day(1), "09:00", "09:15")).unwrap();

        let patch = EventPatch {
            date: Some(day(3)),
            ..Default::default()
        };
        store.update_event("1", &patch).unwrap();

        assert!(store.get_events_for_date(day(1)).is_empty());
        assert_eq!(store.get_events_for_date(day(3)).len(), 1);
    }

    #[test]
    fn unknown_ids_are_noops() {
        let storage = MemoryStorage::new();
        let mut store = EventStore::open(storage.clone());
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        store.subscribe(move |_| *counter.borrow_mut() += 1);

        let patch = EventPatch {
            name: Some("x".to_string()),
            ..Default::default()
        };
        assert!(!store.update_event("missing", &patch).unwrap());
        assert!(!store.delete_event("missing").unwrap());

        assert_eq!(*calls.borrow(), 0);
        assert_eq!(storage.contents(), None);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let mut store = store();
        store.add_event(event("1", "A", day(1), "09:00", "10:00")).unwrap();
        store.add_event(event("2", "B", day(1), "10:00", "11:00")).unwrap();

        store.delete_event("1").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(ids(&store.get_events_for_date(day(1))), vec!["2"]);
    }

    #[test]
    fn filter_matches_name_or_description_case_insensitively() {
        let mut store = store();
        store.add_event(event("1", "Team Sync", day(1), "09:00", "10:00")).unwrap();
        let mut review = event("2", "Review", day(2), "09:00", "10:00");
        review.description = Some("weekly team check-in".to_string());
        store.add_event(review).unwrap();
        let mut dentist = event("3", "Dentist", day(3), "09:00", "10:00");
        dentist.description = Some("bring insurance card".to_string());
        store.add_event(dentist).unwrap();
        store.add_event(event("4", "Gym", day(4), "18:00", "19:00")).unwrap();

        assert_eq!(ids(&store.filter_events("team")), vec!["1", "2"]);
        assert_eq!(ids(&store.filter_events("TEAM")), vec!["1", "2"]);
        assert!(store.filter_events("yoga").is_empty());
    }

    #[test]
    fn snapshots_are_not_affected_by_later_mutations() {
        let mut store = store();
        store.add_event(event("1", "A", day(1), "09:00", "10:00")).unwrap();

        let before = store.events();
        store.delete_event("1").unwrap();

        assert_eq!(before.len(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn mutations_are_persisted_and_reloaded() {
        let storage = MemoryStorage::new();
        let mut store = EventStore::open(storage.clone());
        store.add_event(event("1", "Standup", day(1), "09:00", "09:15")).unwrap();
        store.add_event(event("2", "Lunch", day(1), "12:00", "13:00")).unwrap();
        store.delete_event("2").unwrap();

        let reopened = EventStore::open(storage);
        assert_eq!(&*reopened.events(), &*store.events());
    }

    #[test]
    fn corrupt_storage_opens_empty() {
        let store = EventStore::open(MemoryStorage::with_contents("{ not json"));
        assert!(store.is_empty());
    }

    #[test]
    fn failed_save_keeps_the_event_in_memory() {
        let storage = MemoryStorage::new();
        let mut store = EventStore::open(storage.clone());
        storage.set_fail_writes(true);

        let result = store.add_event(event("1", "Standup", day(1), "09:00", "09:15"));

        assert!(matches!(result, Err(PersistenceError::Unavailable(_))));
        assert_eq!(store.len(), 1);
        assert_eq!(storage.contents(), None);
    }

    #[test]
    fn subscribers_see_each_new_collection() {
        let mut store = store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = store.subscribe(move |events| sink.borrow_mut().push(events.len()));

        store.add_event(event("1", "A", day(1), "09:00", "10:00")).unwrap();
        store.add_event(event("2", "B", day(1), "10:00", "11:00")).unwrap();
        store.delete_event("1").unwrap();
        assert_eq!(*seen.borrow(), vec![1, 2, 1]);

        assert!(store.unsubscribe(sub));
        assert!(!store.unsubscribe(sub));
        store.clear().unwrap();
        assert_eq!(*seen.borrow(), vec![1, 2, 1]);
    }

    #[test]
    fn clear_empties_store_and_storage() {
        let storage = MemoryStorage::new();
        let mut store = EventStore::open(storage.clone());
        store.add_event(event("1", "A", day(1), "09:00", "10:00")).unwrap();

        store.clear().unwrap();

        assert!(store.is_empty());
        assert_eq!(storage.contents(), None);
    }

    #[test]
    fn counts_events_per_day_in_range() {
        let mut store = store();
        store.add_event(event("1", "A", day(1), "09:00", "10:00")).unwrap();
        store.add_event(event("2", "B", day(1), "10:00", "11:00")).unwrap();
        store.add_event(event("3", "C", day(5), "10:00", "11:00")).unwrap();
        store.add_event(event("4", "D", day(20), "10:00", "11:00")).unwrap();

        let counts = store.count_by_date(day(1), day(10));
        assert_eq!(counts.get(&day(1)), Some(&2));
        assert_eq!(counts.get(&day(5)), Some(&1));
        assert_eq!(counts.get(&day(20)), None);
        assert_eq!(counts.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_distinct_adds_are_all_retrievable(days in proptest::collection::vec(1u32..=31, 0..40)) {
            let mut store = store();
            for (i, d) in days.iter().enumerate() {
                store
                    .add_event(event(&i.to_string(), "Event", day(*d), "09:00", "10:00"))
                    .unwrap();
            }

            prop_assert_eq!(store.len(), days.len());
            for (i, d) in days.iter().enumerate() {
                let id = i.to_string();
                prop_assert!(store.get_events_for_date(day(*d)).iter().any(|e| e.id == id));
            }
        }

        #[test]
        fn prop_delete_shrinks_by_at_most_one(count in 0usize..15, target in 0usize..20) {
            let mut store = store();
            for i in 0..count {
                store
                    .add_event(event(&i.to_string(), "Event", day(1), "09:00", "10:00"))
                    .unwrap();
            }

            let removed = store.delete_event(&target.to_string()).unwrap();
            let expected = if target < count { count - 1 } else { count };
            prop_assert_eq!(removed, target < count);
            prop_assert_eq!(store.len(), expected);
        }
    }
}
