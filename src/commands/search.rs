use anyhow::Result;
use daybook_core::EventStore;
use daybook_core::persist::Storage;
use owo_colors::OwoColorize;

use crate::render;

pub fn run<S: Storage>(store: &EventStore<S>, keyword: &str) -> Result<()> {
    let mut matches = store.filter_events(keyword);

    if matches.is_empty() {
        println!("{}", format!("No events matching '{keyword}'").dimmed());
        return Ok(());
    }

    // Stable sort keeps insertion order within a day
    matches.sort_by_key(|e| e.date);
    println!("{}", render::grouped_by_day(&matches));
    Ok(())
}
