//! Event entry: validating user input before it reaches the store.
//!
//! The store accepts whatever it is given, so conflict-freedom is enforced
//! here. Anything that adds events on a user's behalf should go through
//! [`EventDraft::submit`].

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::error::{PersistenceError, ValidationError};
use crate::event::{ClockTime, Event};
use crate::persist::Storage;
use crate::store::EventStore;

/// Raw form input for a new event on `date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
    pub color: Option<String>,
}

/// A draft that passed validation, with its parsed times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    /// Nothing was added.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The event was added for this session but could not be saved.
    #[error("Event {id} was added but not saved: {source}")]
    NotSaved {
        id: String,
        #[source]
        source: PersistenceError,
    },
}

impl EventDraft {
    /// An empty form for `date`.
    pub fn new(date: NaiveDate) -> Self {
        EventDraft {
            name: String::new(),
            date,
            start_time: String::new(),
            end_time: String::new(),
            description: String::new(),
            color: None,
        }
    }

    /// Check required fields, time format and ordering, then look for a
    /// conflict among `existing` (the events already on this draft's date).
    ///
    /// The first failure wins.
    pub fn validate<'a>(
        &self,
        existing: impl IntoIterator<Item = &'a Event>,
    ) -> Result<ValidDraft, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.start_time.trim().is_empty() {
            return Err(ValidationError::MissingField("start time"));
        }
        if self.end_time.trim().is_empty() {
            return Err(ValidationError::MissingField("end time"));
        }

        let start_time = ClockTime::parse(&self.start_time)?;
        let end_time = ClockTime::parse(&self.end_time)?;

        if end_time <= start_time {
            return Err(ValidationError::EndNotAfterStart {
                start: start_time.to_string(),
                end: end_time.to_string(),
            });
        }

        if let Some(clash) = find_conflict(&start_time, &end_time, existing) {
            return Err(ValidationError::Conflict {
                name: clash.name.clone(),
                start: clash.start_time.to_string(),
                end: clash.end_time.to_string(),
            });
        }

        Ok(ValidDraft {
            start_time,
            end_time,
        })
    }

    /// Validate against the events already on this date and add the result.
    ///
    /// Returns the new event's id.
    pub fn submit<S: Storage>(self, store: &mut EventStore<S>) -> Result<String, SubmitError> {
        let valid = self.validate(store.get_events_for_date(self.date))?;
        let event = self.into_event(valid);
        let id = event.id.clone();

        debug!(id = %id, "draft accepted");
        store
            .add_event(event)
            .map_err(|source| SubmitError::NotSaved {
                id: id.clone(),
                source,
            })?;

        Ok(id)
    }

    fn into_event(self, valid: ValidDraft) -> Event {
        let description = self.description.trim();
        Event {
            id: Event::new_id(),
            name: self.name.trim().to_string(),
            date: self.date,
            start_time: valid.start_time,
            end_time: valid.end_time,
            description: (!description.is_empty()).then(|| description.to_string()),
            color: self.color.filter(|c| !c.trim().is_empty()),
        }
    }
}

/// Whether `[start, end)` clashes with `existing`, assuming both are on the
/// same day.
///
/// A clash is a start inside `[s, e)`, an end inside `(s, e]`, or a range
/// that swallows the existing one. The last case is stricter than a plain
/// start-inside/end-inside check, which lets a long event enclose a short one.
/// Back-to-back ranges do not clash.
pub fn conflicts(start: &ClockTime, end: &ClockTime, existing: &Event) -> bool {
    existing.overlaps(start, end)
}

/// First event in `existing` that clashes with `[start, end)`.
pub fn find_conflict<'a>(
    start: &ClockTime,
    end: &ClockTime,
    existing: impl IntoIterator<Item = &'a Event>,
) -> Option<&'a Event> {
    existing.into_iter().find(|e| conflicts(start, end, e))
}
