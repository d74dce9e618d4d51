use anyhow::Result;
use daybook_core::EventStore;
use daybook_core::persist::Storage;
use owo_colors::OwoColorize;

use super::warn_if_unsaved;

pub fn run<S: Storage>(store: &mut EventStore<S>, id: &str) -> Result<()> {
    let Some(name) = store.get_event(id).map(|e| e.name.clone()) else {
        println!("{}", format!("No event with id {id}").dimmed());
        return Ok(());
    };

    if warn_if_unsaved(store.delete_event(id)).is_some() {
        println!("Deleted {}", name.bold());
    } else {
        println!("Deleted {} (this session only)", name.bold());
    }
    Ok(())
}
