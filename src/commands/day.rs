use anyhow::Result;
use daybook_core::EventStore;
use daybook_core::persist::Storage;

use super::parse_date;
use crate::render;

pub fn run<S: Storage>(store: &EventStore<S>, date: &str) -> Result<()> {
    let date = parse_date(date)?;
    let events = store.get_events_for_date(date);
    println!("{}", render::day_listing(date, &events));
    Ok(())
}
