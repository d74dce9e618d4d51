//! Durable storage for the event collection.
//!
//! The store talks to its storage medium only through the [`Storage`] trait.
//! Every adapter keeps one named entry holding the whole collection as JSON:
//!
//! ```json
//! { "state": { "events": [ ... ] }, "version": 0 }
//! ```

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::{Deserialize, Serialize};

use crate::error::{PersistenceError, PersistenceResult};
use crate::event::Event;

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 0;

/// Default name of the storage entry.
pub const DEFAULT_STORAGE_NAME: &str = "event-calendar-storage";

/// A durable home for the event collection.
pub trait Storage {
    /// Read the stored collection. A missing entry is an empty collection.
    fn load(&self) -> PersistenceResult<Vec<Event>>;

    /// Overwrite the stored entry with `events`.
    fn save(&self, events: &[Event]) -> PersistenceResult<()>;

    /// Delete the stored entry.
    fn remove(&self) -> PersistenceResult<()>;
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    state: StateRef<'a>,
    version: u32,
}

#[derive(Serialize)]
struct StateRef<'a> {
    events: &'a [Event],
}

#[derive(Deserialize)]
struct Snapshot {
    state: State,
    #[serde(default)]
    version: u32,
}

#[derive(Deserialize)]
struct State {
    #[serde(default)]
    events: Vec<Event>,
}

/// Serialize the full collection into snapshot text.
pub fn encode(events: &[Event]) -> PersistenceResult<String> {
    let snapshot = SnapshotRef {
        state: StateRef { events },
        version: SNAPSHOT_VERSION,
    };
    Ok(serde_json::to_string(&snapshot)?)
}

/// Parse snapshot text back into events.
pub fn decode(text: &str) -> PersistenceResult<Vec<Event>> {
    let snapshot: Snapshot = serde_json::from_str(text)?;
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(PersistenceError::UnsupportedVersion(snapshot.version));
    }
    Ok(snapshot.state.events)
}
