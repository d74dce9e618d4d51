//! In-memory storage, mainly for tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{Storage, decode, encode};
use crate::error::{PersistenceError, PersistenceResult};
use crate::event::Event;

/// Holds the snapshot text in memory.
///
/// Clones share the same slot, so a test can keep one handle while the store
/// owns another and inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Rc<RefCell<Option<String>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw snapshot text already in the slot.
    pub fn with_contents(text: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.slot.replace(Some(text.into()));
        storage
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    /// Make every following `save` and `remove` fail, as a full or
    /// unavailable medium would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    fn check_writable(&self) -> PersistenceResult<()> {
        if self.fail_writes.get() {
            return Err(PersistenceError::Unavailable(
                "storage quota exceeded".to_string(),
            ));
        }
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> PersistenceResult<Vec<Event>> {
        match self.slot.borrow().as_deref() {
            Some(text) => decode(text),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, events: &[Event]) -> PersistenceResult<()> {
        self.check_writable()?;
        let text = encode(events)?;
        self.slot.replace(Some(text));
        Ok(())
    }

    fn remove(&self) -> PersistenceResult<()> {
        self.check_writable()?;
        self.slot.replace(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_loads_empty() {
        assert!(MemoryStorage::new().load().unwrap().is_empty());
    }

    #[test]
    fn clones_share_the_slot() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();

        storage.save(&[]).unwrap();
        assert_eq!(
            handle.contents().as_deref(),
            Some(r#"{"state":{"events":[]},"version":0}"#)
        );
    }

    #[test]
    fn failing_writes_leave_the_slot_alone() {
        let storage = MemoryStorage::with_contents("previous");
        storage.set_fail_writes(true);

        assert!(matches!(
            storage.save(&[]),
            Err(PersistenceError::Unavailable(_))
        ));
        assert!(storage.remove().is_err());
        assert_eq!(storage.contents().as_deref(), Some("previous"));
    }
}
