use anyhow::Result;
use daybook_core::EventStore;
use daybook_core::persist::Storage;

use super::warn_if_unsaved;

pub fn run<S: Storage>(store: &mut EventStore<S>) -> Result<()> {
    let count = store.len();
    warn_if_unsaved(store.clear());
    println!("Removed {} {}", count, if count == 1 { "event" } else { "events" });
    Ok(())
}
